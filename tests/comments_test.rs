use agreste::comments::{CommentError, CommentsService};
use agreste::config::{CommentBackend, CommentsConfig, RemoteConfig};

fn memory_service() -> CommentsService {
    let config = CommentsConfig {
        backend: CommentBackend::Memory,
        ..CommentsConfig::default()
    };
    CommentsService::from_config(&config, &RemoteConfig::default())
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let service = memory_service();
    assert!(service.is_enabled());

    assert!(service.save("card_phase_1", "ana@example.org", "Fase bem definida").await.unwrap());
    assert!(service.save("card_phase_1", "bia@example.org", "Concordo").await.unwrap());
    assert!(service.save("card_phase_2", "ana@example.org", "Falta cronograma").await.unwrap());

    let phase_one = service.list(Some("card_phase_1")).await.unwrap();
    assert_eq!(phase_one.len(), 2);
    assert_eq!(phase_one[0].comment, "Concordo");
    assert!(phase_one.iter().all(|c| c.project == "st-textile-pe"));

    let shown = CommentsService::display(&phase_one[1], "ana@example.org");
    assert_eq!(shown.author, "ana@exam");
    assert!(shown.can_delete);
    assert_ne!(shown.date, "Data não disponível");

    // someone else's comment is left alone
    let bia_comment = phase_one[0].id.unwrap();
    assert_eq!(service.delete(bia_comment, "ana@example.org").await.unwrap(), 0);
    assert_eq!(service.delete(bia_comment, "bia@example.org").await.unwrap(), 1);
    assert_eq!(service.list(Some("card_phase_1")).await.unwrap().len(), 1);
    assert_eq!(service.list(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_blank_comment_never_reaches_the_store() {
    let service = memory_service();
    let err = service.save("card_phase_1", "ana", " \n\t ").await.unwrap_err();
    assert!(matches!(err, CommentError::EmptyComment));
    assert!(service.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_backend_without_credentials_is_disabled() {
    let service = CommentsService::from_config(&CommentsConfig::default(), &RemoteConfig::default());
    assert!(!service.is_enabled());
    assert!(service.list(Some("card_phase_1")).await.unwrap().is_empty());

    let disabled = CommentsConfig {
        backend: CommentBackend::Disabled,
        ..CommentsConfig::default()
    };
    assert!(!CommentsService::from_config(&disabled, &RemoteConfig::default()).is_enabled());
}
