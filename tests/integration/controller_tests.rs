/*!
 * Integration tests for batch episode processing
 */

use plotclip::app_config::Config;
use plotclip::app_controller::Controller;

use crate::common;

fn conflict_srt(conflict_lines: usize) -> String {
    let mut body = String::new();
    for i in 0..120 {
        let start = i as u64 * 4;
        let end = start + 3;
        let text = if (40..40 + conflict_lines).contains(&i) {
            "双方冲突激烈 争执不断！".to_string()
        } else {
            format!("第{}句平常的台词", i)
        };
        body.push_str(&format!(
            "{}\n00:{:02}:{:02},000 --> 00:{:02}:{:02},000\n{}\n\n",
            i + 1,
            start / 60,
            start % 60,
            end / 60,
            end % 60,
            text
        ));
    }
    body
}

/// Test an analyze-only batch over a directory of subtitle files
#[tokio::test]
async fn test_run_withAnalyzeOnly_shouldWriteReportPerEpisode() {
    let temp_dir = common::create_temp_dir().unwrap();
    let subtitles_dir = temp_dir.path().join("subs");
    let output_dir = temp_dir.path().join("clips");
    std::fs::create_dir_all(&subtitles_dir).unwrap();

    common::create_test_file(&subtitles_dir, "ep01.srt", &conflict_srt(25)).unwrap();
    common::create_test_file(&subtitles_dir, "ep02.srt", &conflict_srt(0)).unwrap();

    let controller = Controller::with_config(Config::default()).unwrap();
    controller
        .run(subtitles_dir, None, output_dir.clone(), true)
        .await
        .unwrap();

    let report_one = std::fs::read_to_string(output_dir.join("E01_report.txt")).unwrap();
    assert!(report_one.contains("第01集"));
    assert!(report_one.contains("key_conflict"));

    // The quiet episode still gets a report, with zero clips
    let report_two = std::fs::read_to_string(output_dir.join("E02_report.txt")).unwrap();
    assert!(report_two.contains("共 0 个片段"));
}

/// Test that a broken subtitle file does not stop the batch
#[tokio::test]
async fn test_run_withOneBrokenFile_shouldStillProcessTheRest() {
    let temp_dir = common::create_temp_dir().unwrap();
    let subtitles_dir = temp_dir.path().join("subs");
    let output_dir = temp_dir.path().join("clips");
    std::fs::create_dir_all(&subtitles_dir).unwrap();

    common::create_test_file(&subtitles_dir, "ep01.srt", "no valid entries here").unwrap();
    common::create_test_file(&subtitles_dir, "ep02.srt", &conflict_srt(25)).unwrap();

    let controller = Controller::with_config(Config::default()).unwrap();
    controller
        .run(subtitles_dir, None, output_dir.clone(), true)
        .await
        .unwrap();

    assert!(!output_dir.join("E01_report.txt").exists());
    assert!(output_dir.join("E02_report.txt").exists());
}

/// Test that a missing subtitle directory is an error
#[tokio::test]
async fn test_run_withMissingDirectory_shouldError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(Config::default()).unwrap();

    let result = controller
        .run(
            temp_dir.path().join("does_not_exist"),
            None,
            temp_dir.path().join("clips"),
            true,
        )
        .await;
    assert!(result.is_err());
}

/// Test that a directory without subtitle files is an error
#[tokio::test]
async fn test_run_withNoSubtitleFiles_shouldError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let subtitles_dir = temp_dir.path().join("subs");
    std::fs::create_dir_all(&subtitles_dir).unwrap();
    common::create_test_file(&subtitles_dir, "notes.txt", "not a subtitle").unwrap();

    let controller = Controller::with_config(Config::default()).unwrap();
    let result = controller
        .run(
            subtitles_dir,
            None,
            temp_dir.path().join("clips"),
            true,
        )
        .await;
    assert!(result.is_err());
}
