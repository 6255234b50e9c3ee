mod fixtures;
mod repo_tests;
mod user_tests;
