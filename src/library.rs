//! Show library loading.
//!
//! Turns a player-chosen directory of images into a registered show: scan
//! the directory (non-recursive, extension allow-list, hidden files
//! excluded, filename order), register each image in the shared
//! [`TextureStore`] under a normalized path key, and upsert the show into
//! the [`ShowStore`]. Removal tombstones the registry record and evicts
//! shared textures only once no surviving show references the same source
//! directory.
//!
//! Nothing here panics across the boundary: a missing or unreadable
//! directory is an `Err`, a file that vanishes mid-load is logged and
//! skipped, and an empty directory is a legal zero-frame show.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};

use crate::resources::clock::RegistryClock;
use crate::resources::devicecatalog::DeviceKind;
use crate::resources::settings::{ScreenSettings, UserShow};
use crate::resources::showstore::{Frame, ShowDef, ShowStore};
use crate::resources::texturestore::{TextureEntry, TextureStore};

/// Accepted frame image extensions, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

// 2019-03-10T00:00:00Z. Ten digits of seconds since then keep generated ids
// sorted for roughly 300 years.
const ID_EPOCH_UNIX_SECONDS: u64 = 1_552_176_000;

/// Failure to build a show from the filesystem.
#[derive(Debug)]
pub enum ShowLoadError {
    /// The source directory does not exist.
    MissingDir(PathBuf),
    /// The source directory exists but could not be enumerated.
    Unreadable(PathBuf, io::Error),
    /// The show id is not in the persisted user-show list.
    UnknownShow(String),
}

impl fmt::Display for ShowLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowLoadError::MissingDir(path) => {
                write!(f, "path {} does not exist", path.display())
            }
            ShowLoadError::Unreadable(path, e) => {
                write!(f, "error listing files in {}: {}", path.display(), e)
            }
            ShowLoadError::UnknownShow(def_name) => {
                write!(f, "could not find show {def_name}")
            }
        }
    }
}

impl std::error::Error for ShowLoadError {}

/// A user-show record rejected before any mutation happens. Surfaced to the
/// player through the host's modal message surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyLabel,
    NoDeviceKinds,
    MissingPath(String),
    DuplicateId(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyLabel => write!(f, "show name is empty"),
            ConfigError::NoDeviceKinds => write!(f, "no device type selected"),
            ConfigError::MissingPath(path) => write!(f, "path {path} is not a directory"),
            ConfigError::DuplicateId(id) => write!(f, "a show with id {id} already exists"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Build a show's frame list from a directory scan.
///
/// On success mutates the show's frames, device kinds, and source path in
/// place; on failure the show is left untouched. Zero accepted files is a
/// success; the player may keep a show pointing at a directory they fill
/// later. Image registration is idempotent: a path already in the store is
/// reused, which matters for shows sharing a source directory.
pub fn load_show(
    show: &mut ShowDef,
    dir: &Path,
    kinds: &[DeviceKind],
    textures: &mut TextureStore,
) -> Result<(), ShowLoadError> {
    if !dir.is_dir() {
        return Err(ShowLoadError::MissingDir(dir.to_path_buf()));
    }
    let files = list_frame_files(dir)?;
    if files.is_empty() {
        info!(
            "{} : {}: no images found in {}",
            show.def_name,
            show.label,
            dir.display()
        );
    }

    let mut frames = Vec::with_capacity(files.len());
    for path in files {
        let key = TextureStore::normalize_key(&path);
        if !textures.contains(&key) {
            // The file may have vanished or turned unreadable between the
            // listing and this probe; drop the frame, not the show.
            match image::image_dimensions(&path) {
                Ok((width, height)) => {
                    textures.insert(key.clone(), TextureEntry { path, width, height });
                }
                Err(e) => {
                    warn!("{}: skipping {}: {}", show.def_name, key, e);
                    continue;
                }
            }
        }
        frames.push(Frame { tex_key: key });
    }

    show.frames = frames;
    show.device_kinds = kinds.to_vec();
    show.source_path = Some(TextureStore::normalize_key(dir));
    Ok(())
}

/// Load one persisted user-show record and upsert it into the registry.
pub fn load_user_show(
    record: &UserShow,
    store: &mut ShowStore,
    textures: &mut TextureStore,
) -> Result<(), ShowLoadError> {
    let mut show = store
        .get(&record.def_name)
        .cloned()
        .unwrap_or_else(|| user_show_def(record));
    show.label = record.label.clone();
    show.description = record.description.clone();
    show.seconds_between_frames = record.seconds_between_frames;
    show.sort_name = format!("User show : {}", record.label);
    load_show(&mut show, Path::new(&record.path), &record.device_kinds, textures)?;
    store.upsert(show);
    Ok(())
}

/// Startup pass: load every persisted user show, dropping records whose
/// directory is gone, then apply the disabled set and publish the new
/// registry generation.
pub fn load_user_shows(
    settings: &mut ScreenSettings,
    store: &mut ShowStore,
    textures: &mut TextureStore,
    clock: &mut RegistryClock,
) {
    let total = settings.user_shows.len();
    let mut failed: Vec<String> = Vec::new();
    for record in &settings.user_shows {
        if let Err(e) = load_user_show(record, store, textures) {
            warn!("{} : {}: {}", record.def_name, record.label, e);
            info!("Removed {} : {} from list.", record.def_name, record.label);
            failed.push(record.def_name.clone());
        }
    }
    if !failed.is_empty() {
        info!("{} of {} user shows loaded.", total - failed.len(), total);
        settings.user_shows.retain(|r| !failed.contains(&r.def_name));
    }
    store.resolve_disabled(&settings.disabled_shows);
    clock.bump_shows();
}

/// Delete a user show.
///
/// The registry record is tombstoned, never removed, as other subsystems may
/// still hold its id this tick. Texture entries are evicted only when no
/// surviving show scans the same source directory.
pub fn remove_user_show(
    def_name: &str,
    settings: &mut ScreenSettings,
    store: &mut ShowStore,
    textures: &mut TextureStore,
    clock: &mut RegistryClock,
) -> Result<(), ShowLoadError> {
    let Some(pos) = settings
        .user_shows
        .iter()
        .position(|r| r.def_name == def_name)
    else {
        return Err(ShowLoadError::UnknownShow(def_name.to_string()));
    };
    settings.user_shows.remove(pos);
    store.mark_deleted(def_name);

    if let Some(show) = store.get(def_name) {
        let keys: Vec<String> = show.frames.iter().map(|f| f.tex_key.clone()).collect();
        let shared = match show.source_path.as_deref() {
            Some(path) => store
                .all()
                .any(|s| !s.deleted && s.source_path.as_deref() == Some(path)),
            None => true,
        };
        if !shared {
            for key in keys {
                textures.remove(&key);
            }
        }
    }
    clock.bump_shows();
    Ok(())
}

/// Check a user-show record before creating it. Returns the first problem
/// found; nothing is mutated.
pub fn validate_user_show(record: &UserShow, store: &ShowStore) -> Result<(), ConfigError> {
    if record.label.trim().is_empty() {
        return Err(ConfigError::EmptyLabel);
    }
    if record.device_kinds.is_empty() {
        return Err(ConfigError::NoDeviceKinds);
    }
    if !Path::new(&record.path).is_dir() {
        return Err(ConfigError::MissingPath(record.path.clone()));
    }
    if store.contains(&record.def_name) {
        return Err(ConfigError::DuplicateId(record.def_name.clone()));
    }
    Ok(())
}

/// Generate a new user-show id from wall-clock seconds since the project
/// epoch, zero-padded so ids sort chronologically.
pub fn unique_show_id() -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .saturating_sub(ID_EPOCH_UNIX_SECONDS);
    format!("UserShow_{seconds:010}")
}

fn user_show_def(record: &UserShow) -> ShowDef {
    ShowDef {
        def_name: record.def_name.clone(),
        label: record.label.clone(),
        description: record.description.clone(),
        seconds_between_frames: record.seconds_between_frames,
        frames: Vec::new(),
        device_kinds: record.device_kinds.clone(),
        sort_name: String::new(),
        disabled: false,
        deleted: false,
        user_defined: true,
        source_path: None,
    }
}

fn list_frame_files(dir: &Path) -> Result<Vec<PathBuf>, ShowLoadError> {
    let unreadable = |e: io::Error| ShowLoadError::Unreadable(dir.to_path_buf(), e);
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        if !entry.file_type().map_err(unreadable)?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let accepted = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()));
        if accepted {
            files.push(path);
        }
    }
    files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal valid 1x1 RGBA PNG.
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn temp_show_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "telescreen_library_{}_{}",
            std::process::id(),
            tag
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(dir: &Path, name: &str) {
        fs::write(dir.join(name), TINY_PNG).unwrap();
    }

    fn record(def_name: &str, dir: &Path) -> UserShow {
        UserShow {
            def_name: def_name.to_string(),
            path: dir.to_string_lossy().into_owned(),
            label: def_name.to_string(),
            description: String::new(),
            seconds_between_frames: 1.0,
            device_kinds: vec![DeviceKind::Tube],
        }
    }

    fn empty_show(def_name: &str) -> ShowDef {
        user_show_def(&record(def_name, Path::new("")))
    }

    #[test]
    fn missing_directory_fails_and_leaves_the_show_untouched() {
        let mut show = empty_show("a");
        let mut textures = TextureStore::default();
        let err = load_show(
            &mut show,
            Path::new("/no/such/directory"),
            &[DeviceKind::Tube],
            &mut textures,
        )
        .unwrap_err();
        assert!(matches!(err, ShowLoadError::MissingDir(_)));
        assert!(show.frames.is_empty());
        assert!(show.source_path.is_none());
        assert!(textures.is_empty());
    }

    #[test]
    fn scan_filters_sorts_and_skips_hidden_files() {
        let dir = temp_show_dir("scan");
        write_png(&dir, "b.png");
        write_png(&dir, "a.png");
        write_png(&dir, "c.PNG");
        write_png(&dir, ".hidden.png");
        fs::write(dir.join("notes.txt"), b"not an image").unwrap();

        let mut show = empty_show("a");
        let mut textures = TextureStore::default();
        load_show(&mut show, &dir, &[DeviceKind::Tube], &mut textures).unwrap();

        let names: Vec<String> = show
            .frames
            .iter()
            .map(|f| f.tex_key.rsplit('/').next().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.PNG"]);
        assert_eq!(textures.len(), 3);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_directory_is_a_zero_frame_show_not_an_error() {
        let dir = temp_show_dir("empty");
        let mut show = empty_show("a");
        let mut textures = TextureStore::default();
        load_show(&mut show, &dir, &[DeviceKind::Tube], &mut textures).unwrap();
        assert!(show.frames.is_empty());
        assert!(show.source_path.is_some());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_image_is_skipped_not_fatal() {
        let dir = temp_show_dir("corrupt");
        write_png(&dir, "good.png");
        fs::write(dir.join("bad.png"), b"garbage").unwrap();

        let mut show = empty_show("a");
        let mut textures = TextureStore::default();
        load_show(&mut show, &dir, &[DeviceKind::Tube], &mut textures).unwrap();
        assert_eq!(show.frames.len(), 1);
        assert_eq!(textures.len(), 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn loading_twice_keeps_one_registry_and_texture_entry_per_path() {
        let dir = temp_show_dir("idempotent");
        write_png(&dir, "a.png");
        write_png(&dir, "b.png");

        let mut store = ShowStore::default();
        let mut textures = TextureStore::default();
        let rec = record("show", &dir);
        load_user_show(&rec, &mut store, &mut textures).unwrap();
        load_user_show(&rec, &mut store, &mut textures).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(textures.len(), 2);
        assert_eq!(store.get("show").unwrap().frames.len(), 2);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn texture_eviction_is_reference_counted_across_twin_shows() {
        let dir = temp_show_dir("twins");
        write_png(&dir, "a.png");

        let mut settings = ScreenSettings::default();
        settings.user_shows.push(record("one", &dir));
        settings.user_shows.push(record("two", &dir));
        let mut store = ShowStore::default();
        let mut textures = TextureStore::default();
        let mut clock = RegistryClock::default();
        load_user_shows(&mut settings, &mut store, &mut textures, &mut clock);
        assert_eq!(textures.len(), 1);

        remove_user_show("one", &mut settings, &mut store, &mut textures, &mut clock)
            .unwrap();
        // The twin still references the shared directory.
        assert_eq!(textures.len(), 1);
        assert!(store.get("one").unwrap().deleted);

        remove_user_show("two", &mut settings, &mut store, &mut textures, &mut clock)
            .unwrap();
        assert!(textures.is_empty());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn removing_an_unknown_show_fails() {
        let mut settings = ScreenSettings::default();
        let mut store = ShowStore::default();
        let mut textures = TextureStore::default();
        let mut clock = RegistryClock::default();
        let err = remove_user_show(
            "missing",
            &mut settings,
            &mut store,
            &mut textures,
            &mut clock,
        )
        .unwrap_err();
        assert!(matches!(err, ShowLoadError::UnknownShow(_)));
    }

    #[test]
    fn startup_pass_drops_records_whose_directory_is_gone() {
        let dir = temp_show_dir("startup");
        write_png(&dir, "a.png");

        let mut settings = ScreenSettings::default();
        settings.user_shows.push(record("good", &dir));
        settings
            .user_shows
            .push(record("bad", Path::new("/no/such/directory")));
        settings.disabled_shows.insert("good".to_string());

        let mut store = ShowStore::default();
        let mut textures = TextureStore::default();
        let mut clock = RegistryClock::default();
        let generation_before = clock.shows();
        load_user_shows(&mut settings, &mut store, &mut textures, &mut clock);

        assert_eq!(settings.user_shows.len(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("good").unwrap().disabled);
        assert!(clock.shows() > generation_before);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn validation_reports_the_first_problem() {
        let dir = temp_show_dir("validate");
        let store = ShowStore::default();

        let mut rec = record("a", &dir);
        rec.label = "  ".to_string();
        assert_eq!(
            validate_user_show(&rec, &store),
            Err(ConfigError::EmptyLabel)
        );

        let mut rec = record("a", &dir);
        rec.device_kinds.clear();
        assert_eq!(
            validate_user_show(&rec, &store),
            Err(ConfigError::NoDeviceKinds)
        );

        let rec = record("a", Path::new("/no/such/directory"));
        assert!(matches!(
            validate_user_show(&rec, &store),
            Err(ConfigError::MissingPath(_))
        ));

        let rec = record("a", &dir);
        assert_eq!(validate_user_show(&rec, &store), Ok(()));

        let mut populated = ShowStore::default();
        populated.add(user_show_def(&rec));
        assert_eq!(
            validate_user_show(&rec, &populated),
            Err(ConfigError::DuplicateId("a".to_string()))
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn generated_ids_are_prefixed_and_padded() {
        let id = unique_show_id();
        assert!(id.starts_with("UserShow_"));
        assert_eq!(id.len(), "UserShow_".len() + 10);
    }
}
