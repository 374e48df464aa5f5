use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;

use hireboard::board::{
    Application, ApplicationRepository, ApplicationStatus, EmployerAccount, EmployerDirectory,
    EmployerId, JobId, JobPosting, JobRepository, NotificationError, NotificationIntent,
    NotificationPublisher, PlanId, RepositoryError, SeekerDirectory, SeekerId, SeekerProfile,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store backing the service until the platform database is
/// wired in. The conditional counter update holds the employer map lock for
/// the whole read-check-write, which is what makes the quota race-safe here.
#[derive(Default, Clone)]
pub(crate) struct InMemoryBoardStore {
    employers: Arc<Mutex<HashMap<EmployerId, EmployerAccount>>>,
    jobs: Arc<Mutex<HashMap<JobId, JobPosting>>>,
    seekers: Arc<Mutex<HashMap<SeekerId, SeekerProfile>>>,
    applications: Arc<Mutex<HashMap<(SeekerId, JobId), Application>>>,
}

impl InMemoryBoardStore {
    pub(crate) fn add_employer(&self, account: EmployerAccount) {
        self.employers
            .lock()
            .expect("employer mutex poisoned")
            .insert(account.id.clone(), account);
    }

    pub(crate) fn add_seeker(&self, profile: SeekerProfile) {
        self.seekers
            .lock()
            .expect("seeker mutex poisoned")
            .insert(profile.id.clone(), profile);
    }
}

impl EmployerDirectory for InMemoryBoardStore {
    fn fetch_employer(&self, id: &EmployerId) -> Result<Option<EmployerAccount>, RepositoryError> {
        let guard = self.employers.lock().expect("employer mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn increment_posts_if_below(
        &self,
        id: &EmployerId,
        cap: u32,
    ) -> Result<Option<u32>, RepositoryError> {
        let mut guard = self.employers.lock().expect("employer mutex poisoned");
        let account = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if account.posts_used >= cap {
            return Ok(None);
        }
        account.posts_used += 1;
        Ok(Some(account.posts_used))
    }

    fn decrement_posts(&self, id: &EmployerId) -> Result<u32, RepositoryError> {
        let mut guard = self.employers.lock().expect("employer mutex poisoned");
        let account = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        account.posts_used = account.posts_used.saturating_sub(1);
        Ok(account.posts_used)
    }
}

impl JobRepository for InMemoryBoardStore {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.remove(id))
    }

    fn list_jobs(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn jobs_by_employer(&self, employer: &EmployerId) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard
            .values()
            .filter(|job| &job.employer == employer)
            .cloned()
            .collect())
    }
}

impl SeekerDirectory for InMemoryBoardStore {
    fn fetch_seeker(&self, id: &SeekerId) -> Result<Option<SeekerProfile>, RepositoryError> {
        let guard = self.seekers.lock().expect("seeker mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_seekers(&self) -> Result<Vec<SeekerProfile>, RepositoryError> {
        let guard = self.seekers.lock().expect("seeker mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

impl ApplicationRepository for InMemoryBoardStore {
    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        let key = (application.seeker.clone(), application.job.clone());
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, application.clone());
        Ok(application)
    }

    fn fetch_application(
        &self,
        seeker: &SeekerId,
        job: &JobId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard.get(&(seeker.clone(), job.clone())).cloned())
    }

    fn update_application_status(
        &self,
        seeker: &SeekerId,
        job: &JobId,
        status: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        let application = guard
            .get_mut(&(seeker.clone(), job.clone()))
            .ok_or(RepositoryError::NotFound)?;
        application.status = status;
        Ok(application.clone())
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.job == job)
            .cloned()
            .collect())
    }

    fn applications_for_seeker(
        &self,
        seeker: &SeekerId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.seeker == seeker)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<NotificationIntent>>>,
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<NotificationIntent> {
        self.events.lock().expect("intent mutex poisoned").clone()
    }
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, intent: NotificationIntent) -> Result<(), NotificationError> {
        let mut guard = self.events.lock().expect("intent mutex poisoned");
        guard.push(intent);
        Ok(())
    }
}

/// Starter accounts so the service answers meaningfully out of the box.
pub(crate) fn seed_store(store: &InMemoryBoardStore) {
    store.add_employer(EmployerAccount {
        id: EmployerId("beeline-logistics".to_string()),
        company_name: "Beeline Logistics".to_string(),
        plan: PlanId::new("buzz"),
        posts_used: 0,
    });
    store.add_employer(EmployerAccount {
        id: EmployerId("hivemind-labs".to_string()),
        company_name: "Hivemind Labs".to_string(),
        plan: PlanId::new("swarm"),
        posts_used: 0,
    });

    store.add_seeker(SeekerProfile {
        id: SeekerId("sky-tran".to_string()),
        full_name: "Sky Tran".to_string(),
        skills: vec![
            "Python".to_string(),
            "SQL".to_string(),
            "AWS".to_string(),
        ],
        education: vec!["BSc Computer Science".to_string()],
        cv_key: Some("cv/sky-tran.pdf".to_string()),
    });
    store.add_seeker(SeekerProfile {
        id: SeekerId("noor-haddad".to_string()),
        full_name: "Noor Haddad".to_string(),
        skills: vec!["SEO".to_string(), "Content Strategy".to_string()],
        education: vec!["BA Communications".to_string()],
        cv_key: None,
    });
}
