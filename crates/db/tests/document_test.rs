//! Document store integration tests.

mod common;

use common::{at, march, monthly_document, setup_db};
use rust_decimal_macros::dec;
use stipend_core::document::{DocumentCategory, DocumentError, RecordDocumentInput};
use stipend_core::period::{DocumentPeriod, Semester, SemesterPeriod};
use stipend_db::DocumentRepository;
use stipend_shared::types::{DocumentId, StudentId};

#[tokio::test]
async fn test_record_and_list_monthly() {
    let db = setup_db().await;
    let repo = DocumentRepository::new(db);
    let student = StudentId::new();

    let first = repo
        .record_at(
            monthly_document(student, DocumentCategory::BookAllowance, dec!(1200.50), march()),
            at(2026, 3, 2, 0),
        )
        .await
        .unwrap();
    repo.record_at(
        monthly_document(student, DocumentCategory::Receipt, dec!(10), march().next()),
        at(2026, 4, 2, 0),
    )
    .await
    .unwrap();

    let listed = repo
        .list_documents(student, &DocumentPeriod::Monthly(march()))
        .await
        .unwrap();
    assert_eq!(listed, vec![first.clone()]);
    assert_eq!(listed[0].claimed_amount, Some(dec!(1200.50)));
    assert!(listed[0].is_monthly());
}

#[tokio::test]
async fn test_semestral_documents_listed_separately() {
    let db = setup_db().await;
    let repo = DocumentRepository::new(db);
    let student = StudentId::new();
    let semester = DocumentPeriod::Semestral(
        SemesterPeriod::new("2025-2026", Semester::Second).unwrap(),
    );

    let grade_report = repo
        .record(RecordDocumentInput {
            student_id: student,
            category: DocumentCategory::GradeReport,
            claimed_amount: None,
            period: semester.clone(),
        })
        .await
        .unwrap();

    assert_eq!(
        repo.list_documents(student, &semester).await.unwrap(),
        vec![grade_report]
    );
    assert!(
        repo.list_documents(student, &DocumentPeriod::Monthly(march()))
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(repo.list_for_student(student).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_amount_rejected() {
    let db = setup_db().await;
    let repo = DocumentRepository::new(db);
    let result = repo
        .record(monthly_document(
            StudentId::new(),
            DocumentCategory::Receipt,
            dec!(1.005),
            march(),
        ))
        .await;
    assert!(matches!(result, Err(DocumentError::Validation(_))));
}

#[tokio::test]
async fn test_reassign_category() {
    let db = setup_db().await;
    let repo = DocumentRepository::new(db);
    let document = repo
        .record(monthly_document(
            StudentId::new(),
            DocumentCategory::Receipt,
            dec!(450),
            march(),
        ))
        .await
        .unwrap();

    let updated = repo
        .reassign_category(document.id, DocumentCategory::BookAllowance)
        .await
        .unwrap();
    assert_eq!(updated.category, DocumentCategory::BookAllowance);
    assert_eq!(updated.claimed_amount, document.claimed_amount);
    assert_eq!(updated.created_at, document.created_at);
    assert_eq!(repo.find(document.id).await.unwrap(), updated);

    assert!(matches!(
        repo.reassign_category(DocumentId::new(), DocumentCategory::Other)
            .await,
        Err(DocumentError::NotFound(_))
    ));
}
