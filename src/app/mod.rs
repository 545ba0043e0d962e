// App layer: rendering of quotes and training results for the CLI.

pub mod display;
