mod helpers;

mod test_build;
mod test_checks;
mod test_init;
mod test_languages;
mod test_readme;
mod test_watch;
