mod fixtures;

mod watch_tests;
