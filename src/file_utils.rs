use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use std::fs::OpenOptions;
use std::io::Write;
use chrono::Local;

use crate::errors::AppError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for a resegmented subtitle
    // @params: input_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.join(output_filename)
    }

    /// Output path for a file found under `input_root`, keeping its
    /// subdirectories below `output_dir` so equal names in different folders
    /// do not collide
    pub fn mirror_output_path<P1: AsRef<Path>, P2: AsRef<Path>, P3: AsRef<Path>>(
        input_file: P1,
        input_root: P2,
        output_dir: P3,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        let target_dir = input_file
            .strip_prefix(input_root.as_ref())
            .ok()
            .and_then(Path::parent)
            .map(|relative| output_dir.join(relative))
            .unwrap_or_else(|| output_dir.to_path_buf());

        Self::generate_output_path(input_file, target_dir, extension)
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let wanted = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(wanted) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Check that `input` can be read and that `output` can be written.
    ///
    /// Nothing is created: missing output directories are judged by the
    /// nearest ancestor that already exists.
    pub fn check_access<P1: AsRef<Path>, P2: AsRef<Path>>(input: P1, output: P2) -> Result<(), AppError> {
        let input = input.as_ref();
        let output = output.as_ref();

        fs::File::open(input)
            .map_err(|e| AppError::InputUnreadable(format!("{}: {}", input.display(), e)))?;

        if output.is_dir() {
            return Err(AppError::OutputUnwritable(format!(
                "{}: is a directory",
                output.display()
            )));
        }

        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let existing = Self::nearest_existing_ancestor(parent);

        let metadata = fs::metadata(existing)
            .map_err(|e| AppError::OutputUnwritable(format!("{}: {}", existing.display(), e)))?;
        if !metadata.is_dir() {
            return Err(AppError::OutputUnwritable(format!(
                "{}: is not a directory",
                existing.display()
            )));
        }
        if metadata.permissions().readonly() {
            return Err(AppError::OutputUnwritable(format!(
                "{}: directory is read-only",
                existing.display()
            )));
        }

        Ok(())
    }

    // Relative paths with no existing component resolve to the working directory
    fn nearest_existing_ancestor(dir: &Path) -> &Path {
        dir.ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .find(|p| p.exists())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Get current timestamp
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        // Open file in append mode, create if it doesn't exist
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
