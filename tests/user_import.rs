use hr_import::import::import_from_path;
use hr_import::intake::json::read_json_from_str;
use hr_import::intake::{InputFormat, IntakeOptions};
use hr_import::pipeline::{run, ImportOptions, Violation};
use hr_import::records::User;
use hr_import::schema::Schema;
use hr_import::store::{InMemoryStore, RecordStore};

fn store() -> InMemoryStore<User> {
    InMemoryStore::new(&Schema::users().unique_keys)
}

#[test]
fn import_users_csv() {
    let schema = Schema::users();
    let mut store = store();
    let summary = import_from_path(
        "tests/fixtures/users.csv",
        &schema,
        &mut store,
        &IntakeOptions::default(),
        &ImportOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.to_string(), "2 rows imported, 1 row failed");
    assert_eq!(summary.report.failed_rows(), vec![3]);
    assert_eq!(summary.report.entries[0].field, "email");
    assert_eq!(summary.report.entries[0].violation, Violation::Email);

    let emails: Vec<&str> = store.records().iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["ana@example.com", "eva@example.com"]);
    assert_eq!(store.records()[0].role.as_deref(), Some("admin"));
    assert!(!store.records()[1].status);
}

#[test]
fn latin1_export_imports_every_row() {
    let schema = Schema::users();
    let mut store = store();
    let summary = import_from_path(
        "tests/fixtures/users_latin1.csv",
        &schema,
        &mut store,
        &IntakeOptions::default(),
        &ImportOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.to_string(), "3 rows imported, 0 rows failed");
    assert_eq!(store.records()[1].name, "José Muñoz");
    assert_eq!(store.records()[1].role.as_deref(), Some("Bogotá"));
}

#[test]
fn import_users_json() {
    let schema = Schema::users();
    let mut store = store();
    let summary = import_from_path(
        "tests/fixtures/users.json",
        &schema,
        &mut store,
        &IntakeOptions::default(),
        &ImportOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.report.failed_rows(), vec![3]);
    assert_eq!(summary.report.entries[0].field, "name");
    assert_eq!(store.records()[1].role, None);
}

#[test]
fn forced_format_overrides_extension() {
    let schema = Schema::users();
    let mut store = store();
    let opts = IntakeOptions {
        format: Some(InputFormat::Csv),
        ..Default::default()
    };
    // A JSON document read as CSV has no `name`/`email`/`status` headers.
    let err = import_from_path(
        "tests/fixtures/users.json",
        &schema,
        &mut store,
        &opts,
        &ImportOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("missing required column(s)"));
    assert!(store.is_empty());
}

#[test]
fn ndjson_rows_go_through_the_pipeline() {
    let schema = Schema::users();
    let input = "{\"Name\":\"Ana\",\"Email\":\" Ana@Example.com \",\"Status\":1}\n\
{\"Name\":\"Ana B\",\"Email\":\"ana@example.com\",\"Status\":0}\n";
    let rows = read_json_from_str(input, &schema).unwrap();

    let mut store = store();
    let summary = run(&schema, rows, &mut store, &ImportOptions::default());
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.skipped_duplicates, 1);
    assert_eq!(store.records()[0].email, "ana@example.com");
}
