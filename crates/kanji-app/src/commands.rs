use std::process::ExitCode;

use kanji_core::{DefaultPreprocessor, Preprocessor};
use kanji_lang_japanese::BatchReport;

pub mod lookup;
pub mod memorize;
pub mod personal;

/// Split every argument into single characters, so `kanji l 花火` looks up
/// both 花 and 火
pub fn split_kanji(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| DefaultPreprocessor.split_characters(arg))
        .collect()
}

/// Print failures and pick the exit status: failure only when nothing resolved
pub fn report_failures(report: &BatchReport) -> ExitCode {
    for (input, error) in report.failures() {
        eprintln!("Error: {}: {}", input, error);
    }
    if report.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
