/*!
 * Tests for error types and conversions
 */

use std::error::Error;

use paratrans::errors::{AppError, PipelineError, ProviderError, Stage, StageError, TranslationError};

#[test]
fn test_providerError_badNetwork_shouldDisplayCorrectly() {
    let error = ProviderError::BadNetwork("operation timed out".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Bad network"));
    assert!(display.contains("operation timed out"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "Internal Server Error".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("Internal Server Error"));
}

#[test]
fn test_providerError_rateLimitExceeded_shouldReportAttempts() {
    let error = ProviderError::RateLimitExceeded { attempts: 3 };
    assert_eq!(format!("{}", error), "Rate limit exceeded after 3 attempt(s)");
}

#[test]
fn test_translationError_forRow_withParseError_shouldBecomeDecodeError() {
    let error = TranslationError::for_row(42, ProviderError::ParseError("not JSON".to_string()));

    match error {
        TranslationError::Decode { row_id, message } => {
            assert_eq!(row_id, 42);
            assert_eq!(message, "not JSON");
        }
        other => panic!("Expected Decode, got {:?}", other),
    }
}

#[test]
fn test_translationError_forRow_withOtherError_shouldWrapProvider() {
    let error = TranslationError::for_row(1, ProviderError::RateLimitExceeded { attempts: 2 });
    assert!(matches!(error, TranslationError::Provider(ProviderError::RateLimitExceeded { attempts: 2 })));
}

#[test]
fn test_pipelineError_shouldNameStageAndKeepSource() {
    let error = PipelineError::new(
        Stage::Sort,
        StageError::InvalidRowId {
            record: 4,
            value: "x".to_string(),
        },
    );

    assert_eq!(format!("{}", error), "sort stage failed: record 4: invalid row id 'x'");
    assert!(error.source().is_some());
}

#[test]
fn test_pipelineError_fromIoError_shouldConvert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let error = PipelineError::new(Stage::Catalog, io);

    assert_eq!(error.stage, Stage::Catalog);
    assert!(matches!(error.source, StageError::Io(_)));
}

#[test]
fn test_appError_conversions_shouldWrapCorrectly() {
    let from_provider: AppError = ProviderError::RequestFailed("refused".to_string()).into();
    assert!(matches!(from_provider, AppError::Provider(_)));

    let from_io: AppError = std::io::Error::other("disk full").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(from_anyhow, AppError::Unknown(message) if message == "boom"));
}

#[test]
fn test_appError_fromContextWrappedPipelineError_shouldKeepStage() {
    let failed: Result<(), PipelineError> = Err(PipelineError::new(
        Stage::Extract,
        StageError::InvalidRowId {
            record: 1,
            value: "x".to_string(),
        },
    ));
    let error = anyhow::Context::context(failed, "Post-processing failed").unwrap_err();

    let app_error = AppError::from(error);

    assert!(matches!(&app_error, AppError::Pipeline(e) if e.stage == Stage::Extract));
    assert_eq!(app_error.exit_code(), 1);
}

#[test]
fn test_appError_exitCode_shouldSeparateConfigErrors() {
    assert_eq!(AppError::Config("missing input".to_string()).exit_code(), 2);
    assert_eq!(AppError::File("gone".to_string()).exit_code(), 1);
    assert_eq!(AppError::from(anyhow::anyhow!("boom")).exit_code(), 1);
}
