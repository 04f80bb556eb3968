// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution requests and results exchanged with a module executor.

/// An argument vector for one module run.
///
/// `argv[0]` is the program name; the rest is what a shell would pass. The
/// vector cannot be changed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    argv: Vec<String>,
}

impl ExecutionRequest {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = std::iter::once(program.to_string())
            .chain(args.into_iter().map(Into::into))
            .collect();
        Self { argv }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// The first argument, which is the subcommand for pdfcpu.
    pub fn subcommand(&self) -> Option<&str> {
        self.argv.get(1).map(String::as_str)
    }
}

/// What a module run left behind, besides files in the virtual filesystem.
///
/// Exit code 0 is success. Any other value is a failure whose meaning belongs
/// to the binary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ExecutionResult {
    pub fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Self::default()
        }
    }

    pub fn with_output(mut self, stdout: Vec<String>, stderr: Vec<String>) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Captured output as status lines: stdout verbatim, then stderr with an
    /// `Error: ` prefix.
    pub fn status_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.stdout
            .iter()
            .cloned()
            .chain(self.stderr.iter().map(|line| format!("Error: {}", line)))
    }
}

/// Split captured output into non-empty lines.
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_keeps_program_first() {
        let request = ExecutionRequest::new("pdfcpu", ["validate", "-c", "disable", "/a.pdf"]);
        assert_eq!(request.program(), "pdfcpu");
        assert_eq!(request.subcommand(), Some("validate"));
        assert_eq!(request.args().len(), 4);
        assert_eq!(request.argv()[4], "/a.pdf");
    }

    #[test]
    fn test_status_lines_prefix_stderr() {
        let result = ExecutionResult::new(1).with_output(
            vec!["Processing(1/2)".to_string()],
            vec!["bad xref".to_string()],
        );
        let lines: Vec<String> = result.status_lines().collect();
        assert_eq!(lines, vec!["Processing(1/2)", "Error: bad xref"]);
        assert!(!result.is_success());
    }

    #[test]
    fn test_split_lines_drops_blank_lines() {
        let lines = split_lines(b"one\r\n\ntwo\n");
        assert_eq!(lines, vec!["one", "two"]);
    }
}
