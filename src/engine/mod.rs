pub mod process;
pub mod types;

pub use process::ProcessRunner;
pub use types::RunOutput;

/// Executes one engine command line to completion.
///
/// Implementations never fail past this boundary: launch problems are carried
/// in [`RunOutput::error`] with an absent status.
pub trait Runner {
    fn run(&self, command_line: &str, extra_env: &[(&str, &str)]) -> RunOutput;
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run(&self, command_line: &str, extra_env: &[(&str, &str)]) -> RunOutput {
        (**self).run(command_line, extra_env)
    }
}

/// Keeps only the stderr lines mentioning "Error", or the whole trimmed text if none do.
pub fn parse_errors(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| l.contains("Error")).collect();
    if lines.is_empty() {
        stderr.trim().to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::parse_errors;

    #[test]
    fn keeps_error_lines_only() {
        let stderr = "Tesseract Open Source OCR Engine v5.3.0\nError opening data file eng.traineddata\nFailed loading language 'eng'\n";
        assert_eq!(parse_errors(stderr), "Error opening data file eng.traineddata");
    }

    #[test]
    fn falls_back_to_trimmed_text() {
        assert_eq!(parse_errors("  read_params_file: Can't open foo\n"), "read_params_file: Can't open foo");
        assert_eq!(parse_errors(""), "");
    }
}
