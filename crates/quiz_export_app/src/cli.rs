use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Export the multiple-choice questions of a quiz review as an Anki CSV file.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Address of the review page, including its `attempt` and `cmid` parameters.
    pub review_url: String,
    /// Quiz title used for the output filename. Defaults to the page title.
    #[clap(short, long)]
    pub title: Option<String>,
    /// Session cookie header value sent to the review site.
    #[clap(long, env = "QUIZ_EXPORT_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,
    /// RON settings file.
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Directory the CSV file is written to.
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Keep remote image references instead of inlining them.
    #[clap(long)]
    pub no_images: bool,
    /// Where log output goes.
    #[clap(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "quiz-export",
            "https://lms.example/mod/quiz/review.php?attempt=1&cmid=2",
            "--title",
            "Week 3",
            "--cookie",
            "MoodleSession=abc",
            "--output-dir",
            "out",
            "--no-images",
            "--log",
            "both",
        ])
        .unwrap();

        assert_eq!(cli.title.as_deref(), Some("Week 3"));
        assert_eq!(cli.cookie.as_deref(), Some("MoodleSession=abc"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert!(cli.no_images);
        assert_eq!(cli.log, LogTarget::Both);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn review_url_is_required() {
        assert!(Cli::try_parse_from(["quiz-export"]).is_err());
    }
}
