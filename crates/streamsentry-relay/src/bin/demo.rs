// crates/streamsentry-relay/src/bin/demo.rs
//
// Minimal standalone runner: binds one session against the null detector
// and transcriber backends, feeds it a handful of synthetic frames and a
// silent audio window, and prints whatever lands on the side channel.
// Stands in for a real ingest loop (RTMP/SRT demux, frame decode) which
// has no place in this workspace.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use crossbeam_channel::unbounded;

use streamsentry_audio::{Lexicon, NullTranscriber};
use streamsentry_core::config::Config;
use streamsentry_core::policy::{PolicySnapshot, VideoCategories};
use streamsentry_video::{NullDetector, Rational, VideoFrame};

use streamsentry_relay::{logging, SessionManager, SideChannelSink};

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = Config::from_env_and_file("streamsentry.json")
        .context("loading configuration")?;
    tracing::info!(?config, "configuration loaded");

    let lexicon = if !config.audio_recognition_enabled {
        Lexicon::empty()
    } else if config.lexicon_path.exists() {
        Lexicon::load(&config.lexicon_path).context("loading profanity lexicon")?
    } else {
        tracing::warn!(path = %config.lexicon_path.display(), "lexicon file missing, audio events disabled");
        Lexicon::empty()
    };

    let session_id = uuid::Uuid::new_v4().to_string();
    let (tx, rx) = unbounded();
    let sink = Arc::new(SideChannelSink::open(session_id.clone(), tx));

    let manager = SessionManager::new();
    manager.bind(
        session_id.clone(),
        Box::new(NullDetector),
        Box::new(NullTranscriber),
        Arc::new(lexicon),
        sink,
    );

    let mut policy = PolicySnapshot::empty();
    policy.video_categories = VideoCategories {
        smoke: true,
        ..Default::default()
    };
    manager.update_policy(&session_id, policy);

    manager.with_session(&session_id, |session| {
        for pts in 0..5 {
            let frame = VideoFrame::new(64, 64, vec![0; 3 * 64 * 64], pts, Rational::new(1, 30));
            session.push_video_frame(frame);
        }
        session.push_audio_samples(&[0i16; 48_000], 1, 16_000, Instant::now());
    });

    std::thread::sleep(std::time::Duration::from_millis(200));

    while let Ok(line) = rx.try_recv() {
        println!("{line}");
    }

    manager.unbind(&session_id);
    Ok(())
}
