use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::board::domain::{
    Application, ApplicationRequest, EmployerAccount, EmployerId, JobDraft, JobId, JobPosting,
    SeekerId, SeekerProfile,
};
use crate::board::plans::{PlanCatalog, PlanId};
use crate::board::repository::{
    ApplicationRepository, EmployerDirectory, JobRepository, NotificationError,
    NotificationIntent, NotificationPublisher, RepositoryError, SeekerDirectory,
};
use crate::board::router::board_router;
use crate::board::service::BoardService;
use crate::board::state::ApplicationStatus;

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    employers: Arc<Mutex<HashMap<EmployerId, EmployerAccount>>>,
    jobs: Arc<Mutex<HashMap<JobId, JobPosting>>>,
    seekers: Arc<Mutex<HashMap<SeekerId, SeekerProfile>>>,
    applications: Arc<Mutex<HashMap<(SeekerId, JobId), Application>>>,
}

impl MemoryStore {
    pub(super) fn add_employer(&self, account: EmployerAccount) {
        self.employers
            .lock()
            .expect("employer mutex poisoned")
            .insert(account.id.clone(), account);
    }

    pub(super) fn add_seeker(&self, profile: SeekerProfile) {
        self.seekers
            .lock()
            .expect("seeker mutex poisoned")
            .insert(profile.id.clone(), profile);
    }

    pub(super) fn job_count(&self) -> usize {
        self.jobs.lock().expect("job mutex poisoned").len()
    }

    pub(super) fn posts_used(&self, id: &EmployerId) -> u32 {
        self.employers
            .lock()
            .expect("employer mutex poisoned")
            .get(id)
            .map(|account| account.posts_used)
            .unwrap_or(0)
    }
}

impl EmployerDirectory for MemoryStore {
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

impl JobRepository for MemoryStore {
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

impl SeekerDirectory for MemoryStore {
    fn fetch_seeker(&self, id: &SeekerId) -> Result<Option<SeekerProfile>, RepositoryError> {
        let guard = self.seekers.lock().expect("seeker mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_seekers(&self) -> Result<Vec<SeekerProfile>, RepositoryError> {
        let guard = self.seekers.lock().expect("seeker mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

impl ApplicationRepository for MemoryStore {
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
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
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<NotificationIntent>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<NotificationIntent> {
        self.events.lock().expect("intent mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, intent: NotificationIntent) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("intent mutex poisoned")
            .push(intent);
        Ok(())
    }
}

pub(super) struct FailingNotifications;

impl NotificationPublisher for FailingNotifications {
    fn publish(&self, _intent: NotificationIntent) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("mail queue offline".to_string()))
    }
}

pub(super) fn employer(id: &str, plan: &str, posts_used: u32) -> EmployerAccount {
    EmployerAccount {
        id: EmployerId(id.to_string()),
        company_name: format!("{id} inc"),
        plan: PlanId::new(plan),
        posts_used,
    }
}

pub(super) fn seeker(id: &str, skills: &[&str], has_cv: bool) -> SeekerProfile {
    SeekerProfile {
        id: SeekerId(id.to_string()),
        full_name: format!("{id} surname"),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        education: vec!["BSc Computer Science".to_string()],
        cv_key: has_cv.then(|| format!("cv/{id}.pdf")),
    }
}

pub(super) fn draft(title: &str, skills: &[&str]) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        category: "technology".to_string(),
        location: "Remote".to_string(),
        required_skills: skills.iter().map(|skill| skill.to_string()).collect(),
        screening_questions: Vec::new(),
    }
}

pub(super) fn draft_with_questions(title: &str, skills: &[&str], questions: &[&str]) -> JobDraft {
    let mut draft = draft(title, skills);
    draft.screening_questions = questions
        .iter()
        .map(|question| question.to_string())
        .collect();
    draft
}

pub(super) fn application_request(
    seeker: &str,
    job: &JobId,
    answers: &[&str],
) -> ApplicationRequest {
    ApplicationRequest {
        seeker_id: SeekerId(seeker.to_string()),
        job_id: job.clone(),
        answers: answers.iter().map(|answer| answer.to_string()).collect(),
        cover_letter: None,
    }
}

/// Service over a seeded in-memory store: two free-tier employers, one
/// unlimited employer, and three seekers (one without a CV on file).
pub(super) fn build_service() -> (
    BoardService<MemoryStore, MemoryNotifications>,
    Arc<MemoryStore>,
    Arc<MemoryNotifications>,
) {
    let store = Arc::new(MemoryStore::default());
    store.add_employer(employer("acme", "buzz", 0));
    store.add_employer(employer("rival", "buzz", 0));
    store.add_employer(employer("mega", "swarm", 0));
    store.add_seeker(seeker("ada", &["Python", "SQL"], true));
    store.add_seeker(seeker("grace", &["COBOL", "Fortran"], false));
    store.add_seeker(seeker("mona", &["Figma", "UX Research"], true));

    let notifications = Arc::new(MemoryNotifications::default());
    let service = BoardService::new(
        store.clone(),
        notifications.clone(),
        PlanCatalog::standard(),
    );
    (service, store, notifications)
}

pub(super) fn acme() -> EmployerId {
    EmployerId("acme".to_string())
}

pub(super) fn rival() -> EmployerId {
    EmployerId("rival".to_string())
}

pub(super) fn mega() -> EmployerId {
    EmployerId("mega".to_string())
}

pub(super) fn ada() -> SeekerId {
    SeekerId("ada".to_string())
}

pub(super) fn board_router_with_service(
    service: BoardService<MemoryStore, MemoryNotifications>,
) -> axum::Router {
    board_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
