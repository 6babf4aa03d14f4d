use crate::error::NetcliError;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;

/// Raw transcript of everything written to and read from the channel,
/// appended to a file when enabled.
pub struct SessionLog {
    file: Option<File>,
    enabled: bool,
}

impl SessionLog {
    pub fn new() -> Self {
        SessionLog {
            file: None,
            enabled: false,
        }
    }

    pub fn enable(&mut self, path: &str) -> Result<(), NetcliError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent).map_err(NetcliError::IoError)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(NetcliError::IoError)?;

        // Write session start header
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        writeln!(file, "{}", "=".repeat(80)).map_err(NetcliError::IoError)?;
        writeln!(file, "SESSION START: {}", timestamp).map_err(NetcliError::IoError)?;
        writeln!(file, "{}", "=".repeat(80)).map_err(NetcliError::IoError)?;
        file.flush().map_err(NetcliError::IoError)?;

        self.file = Some(file);
        self.enabled = true;
        Ok(())
    }

    pub fn disable(&mut self) {
        if self.enabled {
            if let Some(mut file) = self.file.take() {
                let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                let _ = writeln!(file, "\n{}", "=".repeat(80));
                let _ = writeln!(file, "SESSION END: {}", timestamp);
                let _ = writeln!(file, "{}", "=".repeat(80));
            }
            self.enabled = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.enabled
    }

    pub fn write(&mut self, data: &str) -> Result<(), NetcliError> {
        self.write_raw(data.as_bytes())
    }

    pub fn write_raw(&mut self, data: &[u8]) -> Result<(), NetcliError> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(data).map_err(NetcliError::IoError)?;
            file.flush().map_err(NetcliError::IoError)?;
        }
        Ok(())
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}
