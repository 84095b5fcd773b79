use std::fs;
use std::path::PathBuf;

use postercraft::{LayoutHost, PosterRecord, TemplateId};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(format!("{}.sha256", name));
    p
}

async fn capture_fingerprint(id: TemplateId) -> String {
    let mut host = LayoutHost::new("poster-preview", 0.5);
    host.mount(&PosterRecord::seed(), id.descriptor())
        .expect("mount");
    let element = host.offscreen().expect("offscreen instance");
    element.capture(1.0).await.expect("capture").fingerprint()
}

#[tokio::test]
async fn seed_captures_match_goldens() {
    for id in TemplateId::ALL {
        let digest = capture_fingerprint(id).await;
        let expected_path = golden_path(id.as_str());

        if std::env::var("UPDATE_GOLDENS").is_ok() {
            fs::create_dir_all("tests/goldens/expected").ok();
            fs::write(&expected_path, &digest).expect("write golden");
            println!("Updated golden: {:?}", expected_path);
            continue;
        }

        if !expected_path.exists() {
            println!(
                "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
                expected_path
            );
            continue;
        }

        let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
        assert_eq!(digest, expected.trim(), "{} drifted from its golden", id);
    }
}

#[tokio::test]
async fn captures_are_repeatable() {
    for id in TemplateId::ALL {
        assert_eq!(capture_fingerprint(id).await, capture_fingerprint(id).await, "{}", id);
    }
}

#[tokio::test]
async fn templates_look_different() {
    let mut digests = Vec::new();
    for id in TemplateId::ALL {
        digests.push(capture_fingerprint(id).await);
    }
    digests.sort();
    digests.dedup();
    assert_eq!(digests.len(), TemplateId::ALL.len());
}
