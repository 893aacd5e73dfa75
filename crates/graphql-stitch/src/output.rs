use std::process::ExitCode;

const RED_X: &str = "\u{274C}";

/// What a command prints once it finishes, and how the process exits.
#[derive(Debug)]
pub(crate) struct CommandOutput {
    pub exit_code: ExitCode,
    pub stderr: Option<String>,
    pub stdout: Option<String>,
}

impl CommandOutput {
    pub fn failure(err: anyhow::Error) -> Self {
        Self {
            exit_code: ExitCode::FAILURE,
            stderr: Some(format!("{RED_X} {err:#}")),
            stdout: None,
        }
    }

    pub fn success(stdout: String) -> Self {
        Self {
            exit_code: ExitCode::SUCCESS,
            stderr: None,
            stdout: Some(stdout),
        }
    }

    pub fn emit(self) -> ExitCode {
        if let Some(stdout) = self.stdout {
            println!("{stdout}");
        }
        if let Some(stderr) = self.stderr {
            eprintln!("{stderr}");
        }
        self.exit_code
    }
}

impl From<anyhow::Result<String>> for CommandOutput {
    fn from(result: anyhow::Result<String>) -> Self {
        match result {
            Ok(stdout) => Self::success(stdout),
            Err(err) => Self::failure(err),
        }
    }
}
