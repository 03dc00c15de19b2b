use std::fs;

use tempfile::{tempdir, TempDir};

use common::model::source_code::Visibility;

use crate::db::Database;
use crate::error::ServiceError;
use crate::repository::SourceCodeRepository;
use crate::storage::{FileStore, StorageError, Upload};

use super::form::SubmissionForm;
use super::{create_source_code, delete_source_code, update_source_code};

struct TestEnv {
    _dir: TempDir,
    repo: SourceCodeRepository,
    store: FileStore,
}

fn test_env() -> TestEnv {
    let dir = tempdir().unwrap();
    let db = Database::new(dir.path().join("test.sqlite"));
    db.init_schema().unwrap();

    let conn = db.conn().unwrap();
    conn.execute("INSERT INTO users (id, username) VALUES (9, 'ada')", [])
        .unwrap();
    conn.execute("INSERT INTO users (id, username) VALUES (10, 'brian')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO categories (id, name) VALUES (2, 'Algorithms')",
        [],
    )
    .unwrap();

    let store = FileStore::new(dir.path().join("uploads"));
    TestEnv {
        _dir: dir,
        repo: SourceCodeRepository::new(db),
        store,
    }
}

fn submission() -> SubmissionForm {
    SubmissionForm {
        title: "Bubble Sort".to_string(),
        language: "C".to_string(),
        category_id: "2".to_string(),
        code_content: "void sort(int *a, int n) {}".to_string(),
        ..SubmissionForm::default()
    }
}

fn upload(name: &str, bytes: &[u8]) -> Upload {
    Upload {
        original_name: name.to_string(),
        bytes: bytes.to_vec(),
        size: bytes.len() as u64,
    }
}

fn stored_file_count(store: &FileStore) -> usize {
    match fs::read_dir(store.root()) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

#[actix_web::test]
async fn create_with_missing_field_persists_nothing() {
    let env = test_env();

    let mut form = submission();
    form.title = "   ".to_string();
    form.upload = Some(upload("sort.c", b"int main() {}"));

    let result = create_source_code(&env.repo, &env.store, 9, &form).await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
    assert!(env.repo.list_by_owner(9).unwrap().is_empty());
    assert_eq!(stored_file_count(&env.store), 0);
}

#[actix_web::test]
async fn create_without_file_uses_defaults() {
    let env = test_env();

    let id = create_source_code(&env.repo, &env.store, 9, &submission())
        .await
        .unwrap();

    let code = env.repo.find_by_id_for_owner(id, 9).unwrap().unwrap();
    assert_eq!(code.title, "Bubble Sort");
    assert_eq!(code.language, "C");
    assert_eq!(code.category_id, 2);
    assert_eq!(code.visibility, Visibility::Public);
    assert_eq!(code.tags, "");
    assert_eq!(code.file_path, None);
}

#[actix_web::test]
async fn create_with_file_links_the_stored_reference() {
    let env = test_env();

    let mut form = submission();
    form.upload = Some(upload("bubble_sort.c", b"int main() { return 0; }"));

    let id = create_source_code(&env.repo, &env.store, 9, &form)
        .await
        .unwrap();

    let code = env.repo.find_by_id_for_owner(id, 9).unwrap().unwrap();
    let reference = code.file_path.expect("file reference persisted");
    assert!(reference.starts_with("/uploads/"));
    assert!(env.store.exists(&reference));
    assert_eq!(stored_file_count(&env.store), 1);
}

#[actix_web::test]
async fn create_with_oversized_upload_stores_nothing() {
    let env = test_env();

    let mut form = submission();
    form.upload = Some(Upload {
        original_name: "huge.bin".to_string(),
        bytes: Vec::new(),
        size: 6_000_000,
    });

    let result = create_source_code(&env.repo, &env.store, 9, &form).await;
    assert!(matches!(
        result,
        Err(ServiceError::Storage(StorageError::UploadTooLarge))
    ));
    assert!(env.repo.list_by_owner(9).unwrap().is_empty());
    assert_eq!(stored_file_count(&env.store), 0);
}

#[actix_web::test]
async fn update_rejects_bad_ids() {
    let env = test_env();

    for bad in ["", "abc", "0", "-5"] {
        let mut form = submission();
        form.id = bad.to_string();
        let result = update_source_code(&env.repo, &env.store, 9, &form).await;
        assert!(
            matches!(result, Err(ServiceError::InvalidId)),
            "id {:?} should be invalid",
            bad
        );
    }
}

#[actix_web::test]
async fn update_by_non_owner_changes_nothing() {
    let env = test_env();

    let mut create_form = submission();
    create_form.upload = Some(upload("sort.c", b"code"));
    let id = create_source_code(&env.repo, &env.store, 9, &create_form)
        .await
        .unwrap();

    let mut form = submission();
    form.id = id.to_string();
    form.title = "Hijacked".to_string();

    let result = update_source_code(&env.repo, &env.store, 10, &form).await;
    assert!(matches!(result, Err(ServiceError::NotFoundOrForbidden)));

    let code = env.repo.find_by_id_for_owner(id, 9).unwrap().unwrap();
    assert_eq!(code.title, "Bubble Sort");
    assert!(env.store.exists(code.file_path.as_deref().unwrap()));
}

#[actix_web::test]
async fn update_with_new_file_replaces_the_old_one() {
    let env = test_env();

    let mut create_form = submission();
    create_form.upload = Some(upload("v1.c", b"first"));
    let id = create_source_code(&env.repo, &env.store, 9, &create_form)
        .await
        .unwrap();
    let old_ref = env
        .repo
        .find_by_id_for_owner(id, 9)
        .unwrap()
        .unwrap()
        .file_path
        .unwrap();

    let mut form = submission();
    form.id = id.to_string();
    form.upload = Some(upload("v2.c", b"second"));
    update_source_code(&env.repo, &env.store, 9, &form)
        .await
        .unwrap();

    let code = env.repo.find_by_id_for_owner(id, 9).unwrap().unwrap();
    let new_ref = code.file_path.unwrap();
    assert_ne!(new_ref, old_ref);
    assert!(env.store.exists(&new_ref));
    assert!(!env.store.exists(&old_ref));
    // Exactly one file remains for the record.
    assert_eq!(stored_file_count(&env.store), 1);
}

#[actix_web::test]
async fn update_with_remove_file_clears_the_reference() {
    let env = test_env();

    let mut create_form = submission();
    create_form.upload = Some(upload("sort.c", b"code"));
    let id = create_source_code(&env.repo, &env.store, 9, &create_form)
        .await
        .unwrap();

    let mut form = submission();
    form.id = id.to_string();
    form.remove_file = true;
    update_source_code(&env.repo, &env.store, 9, &form)
        .await
        .unwrap();

    let code = env.repo.find_by_id_for_owner(id, 9).unwrap().unwrap();
    assert_eq!(code.file_path, None);
    assert_eq!(stored_file_count(&env.store), 0);
    assert!(code.updated_at >= code.created_at);
}

#[actix_web::test]
async fn update_without_file_changes_keeps_the_reference() {
    let env = test_env();

    let mut create_form = submission();
    create_form.upload = Some(upload("sort.c", b"code"));
    let id = create_source_code(&env.repo, &env.store, 9, &create_form)
        .await
        .unwrap();
    let old_ref = env
        .repo
        .find_by_id_for_owner(id, 9)
        .unwrap()
        .unwrap()
        .file_path
        .unwrap();

    let mut form = submission();
    form.id = id.to_string();
    form.description = "now with a description".to_string();
    update_source_code(&env.repo, &env.store, 9, &form)
        .await
        .unwrap();

    let code = env.repo.find_by_id_for_owner(id, 9).unwrap().unwrap();
    assert_eq!(code.file_path.as_deref(), Some(old_ref.as_str()));
    assert!(env.store.exists(&old_ref));
}

#[actix_web::test]
async fn delete_rejects_bad_ids() {
    let env = test_env();

    for bad in ["", "abc", "0", "-1"] {
        let result = delete_source_code(&env.repo, &env.store, 9, bad).await;
        assert!(matches!(result, Err(ServiceError::InvalidId)));
    }
}

#[actix_web::test]
async fn delete_by_non_owner_leaves_record_and_file() {
    let env = test_env();

    let mut create_form = submission();
    create_form.upload = Some(upload("sort.c", b"code"));
    let id = create_source_code(&env.repo, &env.store, 9, &create_form)
        .await
        .unwrap();

    let result = delete_source_code(&env.repo, &env.store, 10, &id.to_string()).await;
    assert!(matches!(result, Err(ServiceError::NotFoundOrForbidden)));

    let code = env.repo.find_by_id_for_owner(id, 9).unwrap().unwrap();
    assert!(env.store.exists(code.file_path.as_deref().unwrap()));
}

#[actix_web::test]
async fn delete_removes_record_and_file() {
    let env = test_env();

    let mut create_form = submission();
    create_form.upload = Some(upload("sort.c", b"code"));
    let id = create_source_code(&env.repo, &env.store, 9, &create_form)
        .await
        .unwrap();

    delete_source_code(&env.repo, &env.store, 9, &id.to_string())
        .await
        .unwrap();

    assert!(env.repo.find_by_id_for_owner(id, 9).unwrap().is_none());
    assert_eq!(stored_file_count(&env.store), 0);

    // Deleting again reports not found, as for a foreign record.
    let again = delete_source_code(&env.repo, &env.store, 9, &id.to_string()).await;
    assert!(matches!(again, Err(ServiceError::NotFoundOrForbidden)));
}
