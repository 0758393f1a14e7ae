use clap::Parser;

/// Ranks the courses of a graduate program from its exit survey.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the settings of the report. Relative paths in this
    /// file are read from the directory of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The survey export (xlsx, xls or ods). The first sheet is read.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (directory) Where the ranking table and the chart are written. Created if missing.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out_dir: Option<String>,

    /// (file path) A reference ranking table in CSV format. If provided, courserank will
    /// check that the ranking table it wrote matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
