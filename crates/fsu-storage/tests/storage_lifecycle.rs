//! Integration tests for the local storage lifecycle.
//!
//! Each test gets its own resources folder under the system temp directory,
//! so the tests can run in parallel without touching `./Resources`.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use fsu_core::{Absence, Insertion, Lookup, SavePathRejection};
use fsu_storage::{load_layout, LocalStorage, LocalStorageService, StorageLayout};
use uuid::Uuid;

struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("fsu_it_{}", Uuid::new_v4()));
        fs::create_dir_all(&root).expect("create sandbox");
        Self { root }
    }

    fn storage(&self) -> LocalStorageService {
        LocalStorageService::new(StorageLayout::rooted_at(&self.root))
    }

    fn mkdir(&self, relative: &str) -> PathBuf {
        let dir = self.root.join(relative);
        fs::create_dir_all(&dir).expect("create directory");
        dir
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.root).ok();
    }
}

// ── Configuration path ────────────────────────────────────────────────────────

#[test]
fn test_valid_save_directories_round_trip() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();

    for name in ["savegame", "savegame1", "savegame12", "FS22_savegame7"] {
        // Arrange
        let dir = sandbox.mkdir(&format!("saves/{name}"));

        // Act
        let outcome = storage.try_insert_configuration_path(&dir)?;
        let lookup = storage.try_get_configuration_path()?;

        // Assert
        assert_eq!(outcome, Insertion::Stored, "{name} must be accepted");
        assert_eq!(lookup, Lookup::Found(dir));
    }
    Ok(())
}

#[test]
fn test_wrongly_named_directory_is_rejected_with_message() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let dir = sandbox.mkdir("saves/career3");

    let outcome = storage.try_insert_configuration_path(&dir)?;

    assert_eq!(
        outcome.error_message().as_deref(),
        Some("Save directory should be named savegame and number.")
    );
    assert!(!storage.layout().configuration_path().exists());
    Ok(())
}

#[test]
fn test_missing_directory_is_rejected_with_message() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();

    let outcome = storage.try_insert_configuration_path(sandbox.root.join("saves/savegame8"))?;

    assert_eq!(
        outcome.error_message().as_deref(),
        Some("Save directory not found.")
    );
    assert!(!storage.layout().configuration_path().exists());
    Ok(())
}

#[test]
fn test_rejection_does_not_overwrite_stored_path() -> anyhow::Result<()> {
    // Arrange
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let good = sandbox.mkdir("saves/savegame2");
    let bad = sandbox.mkdir("saves/backup");
    let missing = sandbox.root.join("saves/savegame9");
    storage.try_insert_configuration_path(&good)?;
    let before = fs::read(storage.layout().configuration_path())?;

    // Act
    let wrong_name = storage.try_insert_configuration_path(&bad)?;
    let not_found = storage.try_insert_configuration_path(&missing)?;

    // Assert
    assert_eq!(
        wrong_name,
        Insertion::Rejected(SavePathRejection::InvalidDirectoryName)
    );
    assert_eq!(
        not_found,
        Insertion::Rejected(SavePathRejection::DirectoryNotFound)
    );
    assert_eq!(fs::read(storage.layout().configuration_path())?, before);
    assert_eq!(storage.try_get_configuration_path()?, Lookup::Found(good));
    Ok(())
}

#[test]
fn test_fresh_environment_has_no_configuration() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();

    let lookup = storage.try_get_configuration_path()?;

    assert_eq!(lookup, Lookup::Absent(Absence::NoFile));
    assert_eq!(lookup.value_or_default(), PathBuf::new());
    // Reads never create the resources folder.
    assert!(!storage.layout().resources_dir.exists());
    Ok(())
}

// ── Credentials ───────────────────────────────────────────────────────────────

#[test]
fn test_credentials_round_trip() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();

    storage.insert_credentials("alice")?;

    assert_eq!(storage.try_get_username()?, Lookup::Found("alice".to_string()));
    Ok(())
}

#[test]
fn test_latest_credentials_win() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();

    storage.insert_credentials("alice")?;
    storage.insert_credentials("bob")?;

    assert_eq!(storage.try_get_username()?, Lookup::Found("bob".to_string()));
    let json = fs::read_to_string(storage.layout().credentials_path())?;
    assert_eq!(json, r#"{"Username":"bob"}"#);
    Ok(())
}

#[test]
fn test_credentials_and_configuration_share_resources_folder() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let save = sandbox.mkdir("savegame1");

    storage.insert_credentials("farmer")?;
    storage.try_insert_configuration_path(&save)?;

    let mut names: Vec<_> = fs::read_dir(&storage.layout().resources_dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(names, ["config.json", "credentials.json"]);
    Ok(())
}

// ── Lockfile ──────────────────────────────────────────────────────────────────

#[test]
fn test_lockfile_content_returns_text_and_removes_file() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let mut buffer = Cursor::new(b"hello".to_vec());

    let content = storage.get_lockfile_content(&mut buffer)?;

    assert_eq!(content, "hello");
    assert!(!storage.layout().lockfile_path().exists());
    // The caller still owns the buffer, now fully consumed.
    assert_eq!(buffer.position(), 5);
    Ok(())
}

#[test]
fn test_lockfile_honours_custom_layout() -> anyhow::Result<()> {
    // Arrange
    let sandbox = Sandbox::new();
    let layout_file = sandbox.root.join("storage.toml");
    let resources = sandbox.root.join("state");
    fs::write(
        &layout_file,
        format!(
            "resources_dir = {:?}\nlockfile = \"download.lock\"\n",
            resources.to_string_lossy()
        ),
    )?;
    let storage = LocalStorageService::new(load_layout(&layout_file)?);

    // Act
    let content = storage.get_lockfile_content(&mut Cursor::new(b"token".to_vec()))?;

    // Assert
    assert_eq!(content, "token");
    assert_eq!(storage.layout().lockfile_path(), resources.join("download.lock"));
    assert!(resources.is_dir());
    assert!(!resources.join("download.lock").exists());
    Ok(())
}

#[test]
fn test_write_then_delete_file() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let target = sandbox.root.join("upload.bin");

    let written = storage.write_file(&mut Cursor::new(vec![1u8, 2, 3]), &target)?;
    assert_eq!(written, 3);
    assert_eq!(fs::read(&target)?, [1u8, 2, 3]);

    storage.delete_file(&target)?;
    assert!(!target.exists());

    // Deleting again is an error, not a no-op.
    assert!(storage.delete_file(&target).is_err());
    Ok(())
}

// ── Previous save ─────────────────────────────────────────────────────────────

#[test]
fn test_delete_previous_save_removes_whole_tree() -> anyhow::Result<()> {
    // Arrange
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let save = sandbox.mkdir("saves/savegame3");
    fs::create_dir_all(save.join("vehicles"))?;
    fs::write(save.join("careerSavegame.xml"), "<careerSavegame/>")?;
    fs::write(save.join("vehicles").join("tractor.xml"), "<vehicle/>")?;
    storage.try_insert_configuration_path(&save)?;

    // Act
    let removed = storage.delete_previous_save()?;

    // Assert
    assert_eq!(removed.as_deref(), Some(save.as_path()));
    assert!(!save.exists());
    assert!(sandbox.root.join("saves").is_dir(), "parent must survive");
    Ok(())
}

#[test]
fn test_delete_previous_save_without_configuration_is_noop() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let bystander = sandbox.mkdir("saves/savegame1");

    assert_eq!(storage.delete_previous_save()?, None);
    assert_eq!(storage.delete_previous_save()?, None);
    assert!(bystander.is_dir());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_delete_previous_save_removes_read_only_entries() -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let save = sandbox.mkdir("savegame4");
    let file = save.join("locked.xml");
    fs::write(&file, "<x/>")?;
    fs::set_permissions(&file, fs::Permissions::from_mode(0o444))?;
    storage.try_insert_configuration_path(&save)?;

    storage.delete_previous_save()?;

    assert!(!save.exists());
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_save_directory_is_not_stored() -> anyhow::Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    use fsu_storage::StorageError;

    // Arrange: "caf\xE9" is Latin-1, not valid UTF-8
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let save = sandbox
        .root
        .join(OsStr::from_bytes(b"caf\xE9"))
        .join("savegame1");
    fs::create_dir_all(&save)?;

    // Act
    let result = storage.try_insert_configuration_path(&save);

    // Assert
    assert!(matches!(result, Err(StorageError::NonUtf8Path { .. })));
    assert!(!storage.layout().configuration_path().exists());
    assert_eq!(storage.delete_previous_save()?, None);
    assert!(save.is_dir(), "save directory must be left alone");
    Ok(())
}

// ── Trait seam ────────────────────────────────────────────────────────────────

fn stored_slot(storage: &dyn LocalStorage) -> Option<String> {
    storage
        .try_get_configuration_path()
        .ok()?
        .found()
        .and_then(|p: PathBuf| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
}

#[test]
fn test_callers_can_depend_on_trait() -> anyhow::Result<()> {
    let sandbox = Sandbox::new();
    let storage = sandbox.storage();
    let save = sandbox.mkdir("savegame11");

    LocalStorage::try_insert_configuration_path(&storage, Path::new(&save))?;

    assert_eq!(stored_slot(&storage).as_deref(), Some("savegame11"));
    Ok(())
}
