mod common;

mod matching;
mod quota;
