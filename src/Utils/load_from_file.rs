use crate::Thermodynamics::compound_table::CompoundLibrary;
use log::{error, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Task file with optional sections:
/// ```text
/// COMPOUNDS
/// { "compounds": [ ... ] }
/// REACTIONS
/// atp + h2o = adp + pi
/// gtp + h2o = gdp + pi
/// ```
/// A file without any header is read as a bare compound library.
pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_compounds(&self) -> Result<CompoundLibrary, String> {
        load_compound_library(&self.file_name)
    }
    pub fn load_reactions(&self) -> Result<Vec<String>, String> {
        load_reaction_list(&self.file_name)
    }
}

fn read_lines(file_name: &str) -> Result<Vec<String>, String> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(format!("File '{}' does not exist", file_name));
    }
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(format!("Failed to open file '{}': {}", file_name, e)),
    };
    let reader = BufReader::new(file);
    Ok(reader.lines().map_while(Result::ok).collect())
}

fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

/// Lines between one of `headers` and the next header (or the end of the file)
fn find_section(lines: &[String], headers: &[&str]) -> Option<(usize, usize)> {
    let start = lines
        .iter()
        .position(|line| headers.contains(&line.trim().to_uppercase().as_str()))?
        + 1;
    let end = lines[start..]
        .iter()
        .position(|line| is_header(line))
        .map_or(lines.len(), |offset| start + offset);
    Some((start, end))
}

/// Reads the compound library: the `COMPOUNDS` section if present, else the whole file.
/// JSON errors are reported with the offending line and a pointer to the column.
pub fn load_compound_library(file_name: &str) -> Result<CompoundLibrary, String> {
    let lines = read_lines(file_name)?;
    let (start_index, end_index) =
        find_section(&lines, &["COMPOUNDS", "COMPOUND LIBRARY"]).unwrap_or((0, lines.len()));
    let section = lines[start_index..end_index].join("\n");

    match serde_json::from_str::<CompoundLibrary>(&section) {
        Ok(library) => {
            if library.compounds.is_empty() {
                warn!("compound library in '{}' is empty", file_name);
            }
            for record in &library.compounds {
                if record.uncertainty.is_empty() {
                    warn!("compound '{}' has no uncertainty sources", record.id);
                }
            }
            info!("Successfully parsed compound library from file '{}'", file_name);
            Ok(library)
        }
        Err(e) => {
            let error_line = e.line();
            let error_column = e.column();
            // serde counts lines from 1 inside the section
            let actual_line = start_index + error_line.saturating_sub(1);
            let error_msg = format!(
                "Error parsing compound library at line {}, column {} (line {} in file): {}",
                error_line,
                error_column,
                actual_line + 1,
                e
            );
            error!("{}", error_msg);
            if actual_line < lines.len() {
                let problem_line = &lines[actual_line];
                error!("Problematic line: {}", problem_line);
                if error_column >= 1 && error_column <= problem_line.len() {
                    let pointer = " ".repeat(error_column - 1) + "^";
                    error!("{}", pointer);
                }
            }
            Err(error_msg)
        }
    }
}

/// Reactions listed one per line under the `REACTIONS` header; `#` starts a comment line.
pub fn load_reaction_list(file_name: &str) -> Result<Vec<String>, String> {
    let lines = read_lines(file_name)?;
    let Some((start_index, end_index)) = find_section(&lines, &["REACTIONS"]) else {
        return Err(format!("No 'REACTIONS' header found in file '{}'", file_name));
    };
    let reactions: Vec<String> = lines[start_index..end_index]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    if reactions.is_empty() {
        return Err(format!("No reactions found in file '{}'", file_name));
    }
    Ok(reactions)
}
