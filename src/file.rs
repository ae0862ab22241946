use std::{fs, path::Path};

/// Characters of the whole file at `path`.
pub fn file_char_stream(path: &Path) -> Result<impl Iterator<Item = char>, std::io::Error> {
    let source = fs::read_to_string(path)?;
    Ok(source.chars().collect::<Vec<_>>().into_iter())
}
