//! Turning command-line paths into ordered units and an output path.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::driver::Unit;
use crate::error::{Result, TranslateError};

const SOURCE_EXTENSION: &str = "vm";
const OUTPUT_EXTENSION: &str = "asm";

fn is_source(path: &Path) -> bool {
    path.extension().and_then(OsStr::to_str) == Some(SOURCE_EXTENSION)
}

fn stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(OsStr::to_str)
        .map(str::to_string)
        .ok_or_else(|| TranslateError::Input(format!("cannot name unit for {}", path.display())))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> TranslateError + '_ {
    move |source| TranslateError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Source files in translation order.
///
/// A directory contributes its `.vm` files sorted by name; files are taken in
/// the order given.
pub fn discover(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)
                .map_err(io_error(input))?
                .map(|entry| entry.map(|e| e.path()).map_err(io_error(input)))
                .collect::<Result<Vec<_>>>()?;
            found.retain(|path| path.is_file() && is_source(path));
            found.sort();
            if found.is_empty() {
                return Err(TranslateError::Input(format!(
                    "{} contains no .{} files",
                    input.display(),
                    SOURCE_EXTENSION
                )));
            }
            files.extend(found);
        } else if is_source(input) {
            files.push(input.clone());
        } else {
            return Err(TranslateError::Input(format!(
                "{} is not a .{} file or a directory",
                input.display(),
                SOURCE_EXTENSION
            )));
        }
    }
    debug!("discovered {:?}", files);
    Ok(files)
}

/// Where the assembly goes when no output path is given.
pub fn default_output(inputs: &[PathBuf]) -> Result<PathBuf> {
    let first = inputs
        .first()
        .ok_or_else(|| TranslateError::Input("no input given".to_string()))?;
    if first.is_dir() {
        let name = first
            .canonicalize()
            .map_err(io_error(first))?
            .file_name()
            .and_then(OsStr::to_str)
            .map(str::to_string)
            .ok_or_else(|| TranslateError::Input(format!("cannot name output for {}", first.display())))?;
        Ok(first.join(format!("{}.{}", name, OUTPUT_EXTENSION)))
    } else {
        Ok(first.with_extension(OUTPUT_EXTENSION))
    }
}

pub fn load(path: &Path) -> Result<Unit> {
    let source = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(Unit::new(stem(path)?, source))
}

pub fn load_all(files: &[PathBuf]) -> Result<Vec<Unit>> {
    files.iter().map(|path| load(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use test_log::test;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("vmil-translator-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn directory_units_are_sorted_and_filtered() {
        let dir = scratch_dir("discover");
        fs::write(dir.join("Sys.vm"), "function Sys.init 0\n").unwrap();
        fs::write(dir.join("Main.vm"), "function Main.main 0\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let files = discover(&[dir.clone()]).unwrap();
        let names: Vec<_> = files.iter().map(|p| stem(p).unwrap()).collect();
        assert_eq!(names, vec!["Main", "Sys"]);

        let units = load_all(&files).unwrap();
        assert_eq!(units[1].name, "Sys");
        assert!(units[1].source.contains("Sys.init"));

        let output = default_output(&[dir.clone()]).unwrap();
        let dir_name = dir.file_name().unwrap().to_str().unwrap().to_string();
        assert_eq!(output.file_name().unwrap().to_str().unwrap(), format!("{}.asm", dir_name));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn directory_entries_must_be_source_files() {
        let dir = scratch_dir("entries");
        fs::create_dir_all(dir.join("Nested.vm")).unwrap();
        fs::write(dir.join("Main.vm"), "push constant 1\n").unwrap();
        let files = discover(&[dir.clone()]).unwrap();
        assert_eq!(files, vec![dir.join("Main.vm")]);

        fs::remove_file(dir.join("Main.vm")).unwrap();
        assert!(matches!(discover(&[dir.clone()]), Err(TranslateError::Input(_))));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dotted_directory_keeps_its_full_name() {
        let dir = scratch_dir("proj.v2");
        fs::write(dir.join("Main.vm"), "push constant 1\n").unwrap();
        let output = default_output(&[dir.clone()]).unwrap();
        let dir_name = dir.file_name().unwrap().to_str().unwrap().to_string();
        assert!(dir_name.contains("proj.v2"));
        assert_eq!(output, dir.join(format!("{}.asm", dir_name)));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn single_file_output_sits_beside_it() {
        let out = default_output(&[PathBuf::from("prog/SimpleAdd.vm")]).unwrap();
        assert_eq!(out, PathBuf::from("prog/SimpleAdd.asm"));
    }

    #[test]
    fn non_vm_inputs_are_rejected() {
        let err = discover(&[PathBuf::from("readme.md")]).unwrap_err();
        assert!(matches!(err, TranslateError::Input(_)));
    }

    #[test]
    fn missing_files_report_their_path() {
        let err = load(Path::new("/definitely/not/here/Main.vm")).unwrap_err();
        assert!(err.to_string().starts_with("/definitely/not/here/Main.vm"));
    }
}
