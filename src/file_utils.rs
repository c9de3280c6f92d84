use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @returns: File name without its last extension
    pub fn file_stem<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| anyhow!("Cannot derive a file name from {:?}", path))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a text file as `(line_number, text)` pairs, numbering from 1
    pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<(u64, String)>> {
        let content = Self::read_to_string(path)?;
        Ok(content
            .lines()
            .zip(1u64..)
            .map(|(line, number)| (number, line.to_string()))
            .collect())
    }

    /// Count the lines of a text file
    pub fn count_lines<P: AsRef<Path>>(path: P) -> Result<usize> {
        Ok(Self::read_to_string(path)?.lines().count())
    }
}

/// Every file a run reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Source text
    pub input: PathBuf,
    /// Directory holding the artifacts
    pub output_dir: PathBuf,
    /// Unordered worker output
    pub intermediate_csv: PathBuf,
    /// Intermediate rows padded to equal width
    pub normalized_csv: PathBuf,
    /// Rows in row id order
    pub sorted_csv: PathBuf,
    /// One translated line per input line
    pub aligned_text: PathBuf,
    /// Gettext catalog
    pub catalog: PathBuf,
}

impl ArtifactPaths {
    /// Name the artifacts of `input` translated to `target_language` inside `output_dir`
    pub fn for_input<P1: AsRef<Path>, P2: AsRef<Path>>(
        input: P1,
        output_dir: P2,
        target_language: &str,
    ) -> Result<Self> {
        let input = input.as_ref();
        let output_dir = output_dir.as_ref();
        let stem = FileManager::file_stem(input)?;

        Ok(Self {
            input: input.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            intermediate_csv: output_dir.join(format!("{}-intermed.csv", stem)),
            normalized_csv: output_dir.join(format!("{}-normalized.csv", stem)),
            sorted_csv: output_dir.join(format!("{}-sorted.csv", stem)),
            aligned_text: output_dir.join(format!("{}-{}.txt", stem, target_language)),
            catalog: output_dir.join(format!("{}.po", stem)),
        })
    }
}
