/*!
 * End-to-end file translation over the mock endpoint
 */

use anyhow::Result;
use std::fs;

use paratrans::providers::mock::{MockRequest, MockTransport};
use paratrans::providers::TransportResponse;

use crate::common;

#[tokio::test]
async fn test_run_withBlankLine_shouldProduceAlignedArtifacts() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "greetings.txt", "Hello.\n\nGood morning!\n")?;
    let output_dir = temp_dir.path().join("out");
    let transport = MockTransport::translating();
    let mut config = common::test_config();
    config.dispatch.concurrent_requests = 2;

    let report = common::test_controller(&transport, config)?.run(&input, &output_dir).await?;

    assert_eq!(report.summary.total_lines, 3);
    assert_eq!(report.summary.dispatched, 2);
    assert_eq!(report.summary.skipped_blank, 1);
    assert_eq!(report.rows_written, 2);

    let intermediate = fs::read_to_string(&report.paths.intermediate_csv)?;
    assert_eq!(intermediate.lines().count(), 2);

    assert_eq!(
        fs::read_to_string(output_dir.join("greetings-sorted.csv"))?,
        "1,Hello.,[fr] Hello.\n3,Good morning!,[fr] Good morning!\n"
    );
    assert_eq!(
        common::read_lines(&output_dir.join("greetings-fr.txt")),
        vec!["[fr] Hello.", "", "[fr] Good morning!"]
    );

    let po = fs::read_to_string(output_dir.join("greetings.po"))?;
    assert!(po.contains("msgctxt \"00000001\"\nmsgid \"Hello.\"\nmsgstr \"[fr] Hello.\""));
    assert!(po.contains("msgctxt \"00000003\""));
    assert!(!po.contains("msgctxt \"00000002\""));
    Ok(())
}

#[tokio::test]
async fn test_run_withTrailingBlankLines_shouldKeepLineCount() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "t.txt", "\n\na\n\nb\n\n\n")?;
    let transport = MockTransport::translating();

    let report = common::test_controller(&transport, common::test_config())?
        .run(&input, temp_dir.path())
        .await?;

    assert_eq!(report.pipeline.lines, 7);
    assert_eq!(
        common::read_lines(&report.paths.aligned_text),
        vec!["", "", "[fr] a", "", "[fr] b", "", ""]
    );
    Ok(())
}

#[tokio::test]
async fn test_run_withSentenceColumns_shouldCommentThemInCatalog() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "s.txt", "Hi there. Bye\nOk\n")?;
    let transport = MockTransport::translating();
    let mut config = common::test_config();
    config.output.retranslate_sentences = true;

    let report = common::test_controller(&transport, config)?
        .run(&input, temp_dir.path())
        .await?;

    let sorted = fs::read_to_string(&report.paths.sorted_csv)?;
    assert_eq!(
        sorted,
        "1,Hi there. Bye,[fr] Hi there. Bye,Hi there.: [fr] Hi there.,Bye: [fr] Bye\n\
         2,Ok,[fr] Ok,Ok: [fr] Ok,\n"
    );
    assert_eq!(
        common::read_lines(&report.paths.aligned_text),
        vec!["[fr] Hi there. Bye", "[fr] Ok"]
    );
    let po = fs::read_to_string(&report.paths.catalog)?;
    assert!(po.contains("# Hi there.: [fr] Hi there.\n# Bye: [fr] Bye\n#, fuzzy\nmsgctxt \"00000001\""));
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingLine_shouldLeaveItsTranslationEmpty() -> Result<()> {
    common::init_logging();
    fn refuse_secret(request: &MockRequest) -> TransportResponse {
        if request.text.contains("secret") {
            TransportResponse::new(500, "nope")
        } else {
            TransportResponse::new(200, MockTransport::translation_body(&["ok"], &[]))
        }
    }
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "f.txt", "fine\nsecret\nfine again\n")?;
    let transport = MockTransport::translating().with_custom_response(refuse_secret);

    let report = common::test_controller(&transport, common::test_config())?
        .run(&input, temp_dir.path())
        .await?;

    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.rows_written, 3);
    assert_eq!(common::read_lines(&report.paths.aligned_text), vec!["ok", "", "ok"]);
    Ok(())
}

#[tokio::test]
async fn test_run_twice_shouldOverwriteArtifacts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "r.txt", "a\nb\n")?;
    let transport = MockTransport::translating();
    let controller = common::test_controller(&transport, common::test_config())?;

    controller.run(&input, temp_dir.path()).await?;
    fs::write(&input, "c\n")?;
    let report = controller.run(&input, temp_dir.path()).await?;

    assert_eq!(fs::read_to_string(&report.paths.intermediate_csv)?, "1,c,[fr] c\n");
    assert_eq!(common::read_lines(&report.paths.aligned_text), vec!["[fr] c"]);
    Ok(())
}
