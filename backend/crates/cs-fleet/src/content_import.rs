//! Bedrock `.mcworld` import.
//!
//! An upload is validated completely in memory before anything on disk is
//! touched: it must be a zip, contain `level.dat` (after stripping a single
//! shared root folder), and contain no unsafe path segments. The world is
//! then unpacked into a hidden staging directory and swapped into
//! `worlds/<name>`.

use crate::fs_util;

use cs_core::{CoreError, Result as CoreResult};

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use log::info;
use zip::ZipArchive;

pub const WORLD_EXTENSION: &str = "mcworld";
pub const MAX_CONTENT_NAME_LEN: usize = 64;
pub const FALLBACK_CONTENT_NAME: &str = "imported-world";
const LEVEL_MARKER: &str = "level.dat";
const LEVEL_NAME_FILE: &str = "levelname.txt";
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// One archive entry after root stripping.
#[derive(Debug)]
struct PlannedEntry {
    index: usize,
    segments: Vec<String>,
    is_dir: bool,
}

/// True for `name.mcworld`, any case.
pub fn has_world_extension(original_name: &str) -> bool {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(WORLD_EXTENSION))
}

/// Strip filesystem-hostile and control characters, trim, and cap the
/// length. Empty results (and `.`/`..`) become an empty string.
pub fn sanitize_content_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() && !FORBIDDEN_CHARS.contains(c))
        .collect();

    let truncated: String = cleaned.trim().chars().take(MAX_CONTENT_NAME_LEN).collect();
    let name = truncated.trim();

    if name == "." || name == ".." {
        String::new()
    } else {
        name.to_string()
    }
}

/// Reject names that could address anything other than one directory
/// under `worlds/`.
#[track_caller]
pub fn validate_content_name(id: u32, name: &str) -> CoreResult<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);

    if invalid {
        return Err(CoreError::invalid_content_name(id, name));
    }

    Ok(())
}

/// Validate and unpack `bytes` into `worlds_dir/<name>`, replacing any
/// existing world of that name. Returns the world name.
///
/// Blocking; run on a blocking thread.
pub fn import_world(
    id: u32,
    bytes: &[u8],
    original_name: &str,
    worlds_dir: &Path,
) -> CoreResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| CoreError::invalid_archive(id, format!("not a zip archive: {e}")))?;

    let plan = plan_entries(id, &mut archive)?;

    if !plan
        .iter()
        .any(|entry| !entry.is_dir && entry.segments == [LEVEL_MARKER])
    {
        return Err(CoreError::invalid_archive(
            id,
            format!("{LEVEL_MARKER} not found"),
        ));
    }

    let embedded_name = read_level_name(id, &mut archive, &plan)?;
    let name = derive_name(embedded_name.as_deref(), original_name);

    std::fs::create_dir_all(worlds_dir).map_err(|e| CoreError::io(worlds_dir, e))?;
    let staging = worlds_dir.join(format!(".import-{name}"));
    fs_util::remove_dir_if_exists(&staging).map_err(|e| CoreError::io(&staging, e))?;

    if let Err(e) = extract(id, &mut archive, &plan, &staging) {
        let _ = fs_util::remove_dir_if_exists(&staging);
        return Err(e);
    }

    let target = worlds_dir.join(&name);
    fs_util::remove_dir_if_exists(&target).map_err(|e| CoreError::io(&target, e))?;
    std::fs::rename(&staging, &target).map_err(|e| CoreError::io(&target, e))?;

    info!("Server {id}: imported world '{name}'");
    Ok(name)
}

fn plan_entries(id: u32, archive: &mut ZipArchive<Cursor<&[u8]>>) -> CoreResult<Vec<PlannedEntry>> {
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let entry = archive
            .by_index_raw(index)
            .map_err(|e| CoreError::invalid_archive(id, e.to_string()))?;

        let raw = entry.name().replace('\\', "/");
        let is_dir = raw.ends_with('/');
        let trimmed = raw.strip_suffix('/').unwrap_or(&raw);

        let segments: Vec<String> = trimmed.split('/').map(String::from).collect();
        if segments
            .iter()
            .any(|s| s.is_empty() || s == "." || s == "..")
        {
            return Err(CoreError::invalid_archive(
                id,
                format!("unsafe path '{}'", entry.name()),
            ));
        }

        entries.push(PlannedEntry {
            index,
            segments,
            is_dir,
        });
    }

    Ok(strip_common_root(entries))
}

/// Drop a first segment shared by every entry when all files sit below it.
fn strip_common_root(entries: Vec<PlannedEntry>) -> Vec<PlannedEntry> {
    let Some(root) = entries.first().map(|e| e.segments[0].clone()) else {
        return entries;
    };

    let shared = entries.iter().all(|e| {
        e.segments[0] == root && (e.is_dir || e.segments.len() > 1)
    });
    if !shared {
        return entries;
    }

    entries
        .into_iter()
        .filter_map(|mut e| {
            e.segments.remove(0);
            (!e.segments.is_empty()).then_some(e)
        })
        .collect()
}

fn read_level_name(
    id: u32,
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    plan: &[PlannedEntry],
) -> CoreResult<Option<String>> {
    let Some(entry) = plan
        .iter()
        .find(|e| !e.is_dir && e.segments == [LEVEL_NAME_FILE])
    else {
        return Ok(None);
    };

    let mut file = archive
        .by_index(entry.index)
        .map_err(|e| CoreError::invalid_archive(id, e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| CoreError::invalid_archive(id, e.to_string()))?;

    let text = String::from_utf8_lossy(&bytes);
    Ok(text.lines().next().map(|line| line.trim().to_string()))
}

fn derive_name(embedded: Option<&str>, original_name: &str) -> String {
    let from_file = embedded.map(sanitize_content_name).unwrap_or_default();
    if !from_file.is_empty() {
        return from_file;
    }

    // Uploads from Windows browsers may carry a full path
    let file_name = original_name.rsplit(['/', '\\']).next().unwrap_or(original_name);
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let from_stem = sanitize_content_name(stem);
    if from_stem.is_empty() {
        String::from(FALLBACK_CONTENT_NAME)
    } else {
        from_stem
    }
}

fn extract(
    id: u32,
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    plan: &[PlannedEntry],
    staging: &Path,
) -> CoreResult<()> {
    std::fs::create_dir_all(staging).map_err(|e| CoreError::io(staging, e))?;

    for entry in plan {
        let destination: PathBuf = entry
            .segments
            .iter()
            .fold(staging.to_path_buf(), |path, segment| path.join(segment));

        if entry.is_dir {
            std::fs::create_dir_all(&destination).map_err(|e| CoreError::io(&destination, e))?;
            continue;
        }

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
        }

        let mut file = archive
            .by_index(entry.index)
            .map_err(|e| CoreError::invalid_archive(id, e.to_string()))?;
        let mut out =
            std::fs::File::create(&destination).map_err(|e| CoreError::io(&destination, e))?;
        std::io::copy(&mut file, &mut out).map_err(|e| CoreError::io(&destination, e))?;
    }

    Ok(())
}
