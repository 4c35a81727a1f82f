use super::*;

fn sample_json() -> String {
    r#"{
        "tracks": [
            {
                "id": "moonlight-1",
                "title": { "zh": "月光奏鸣曲 第一乐章", "en": "Moonlight Sonata, 1st mvt." },
                "composer": "beethoven",
                "opus": "Op. 27 No. 2",
                "year": 1801,
                "duration": 327.0,
                "category": "classical",
                "audioUrl": "audio/moonlight-1.mp3",
                "coverImage": "covers/moonlight.jpg",
                "history": {
                    "background": "Dedicated to Giulietta Guicciardi.",
                    "context": "Written at the edge of the Classical era.",
                    "analysis": "A sustained triplet ostinato throughout."
                }
            },
            {
                "id": "clair-de-lune",
                "title": { "zh": "月光", "en": "Clair de Lune" },
                "composer": "debussy",
                "duration": 290.5,
                "category": "impressionist",
                "audioUrl": "audio/clair-de-lune.mp3",
                "history": {
                    "background": "Third movement of Suite bergamasque.",
                    "context": "Published in 1905 after heavy revision."
                }
            }
        ],
        "composers": [
            {
                "id": "beethoven",
                "name": { "zh": "贝多芬", "en": "Ludwig van Beethoven" },
                "period": "classical",
                "birthYear": 1770,
                "deathYear": 1827,
                "nationality": "German",
                "biography": "Bridged the Classical and Romantic eras.",
                "famousWorks": ["Symphony No. 5", "Symphony No. 9"]
            },
            {
                "id": "debussy",
                "name": { "zh": "德彪西", "en": "Claude Debussy" },
                "period": "impressionist",
                "birthYear": 1862,
                "deathYear": 1918,
                "nationality": "French",
                "biography": "Central figure of musical impressionism.",
                "famousWorks": ["La Mer", "Clair de Lune"]
            }
        ]
    }"#
    .to_string()
}

#[test]
fn parses_sample_catalog() {
    let catalog = Catalog::from_json(&sample_json()).unwrap();
    assert_eq!(catalog.tracks.len(), 2);
    assert_eq!(catalog.composers.len(), 2);

    let t = &catalog.tracks[0];
    assert_eq!(t.id, "moonlight-1");
    assert_eq!(t.title.en, "Moonlight Sonata, 1st mvt.");
    assert_eq!(t.opus.as_deref(), Some("Op. 27 No. 2"));
    assert_eq!(t.category, Category::Classical);
    assert_eq!(t.audio_url, "audio/moonlight-1.mp3");
    assert_eq!(t.catalog_duration().as_secs(), 327);

    // Optional fields absent on the second track.
    let t2 = &catalog.tracks[1];
    assert!(t2.opus.is_none());
    assert!(t2.year.is_none());
    assert!(t2.cover_image.is_none());
    assert!(t2.history.analysis.is_none());
}

#[test]
fn composer_lookup_follows_foreign_key() {
    let catalog = Catalog::from_json(&sample_json()).unwrap();
    let composer = catalog.composer_for(&catalog.tracks[1]).unwrap();
    assert_eq!(composer.name.en, "Claude Debussy");
    assert_eq!(composer.period, Category::Impressionist);
}

#[test]
fn rejects_dangling_composer_reference() {
    let json = sample_json().replace("\"composer\": \"debussy\"", "\"composer\": \"satie\"");
    match Catalog::from_json(&json) {
        Err(CatalogError::UnknownComposer { track, composer }) => {
            assert_eq!(track, "clair-de-lune");
            assert_eq!(composer, "satie");
        }
        other => panic!("expected UnknownComposer, got {other:?}"),
    }
}

#[test]
fn rejects_duplicate_track_ids() {
    let json = sample_json().replace("\"id\": \"clair-de-lune\"", "\"id\": \"moonlight-1\"");
    assert!(matches!(
        Catalog::from_json(&json),
        Err(CatalogError::DuplicateId { kind: "track", .. })
    ));
}

#[test]
fn non_finite_duration_collapses_to_zero() {
    let mut catalog = Catalog::from_json(&sample_json()).unwrap();
    catalog.tracks[0].duration = -5.0;
    assert_eq!(catalog.tracks[0].catalog_duration(), std::time::Duration::ZERO);
    catalog.tracks[0].duration = f64::NAN;
    assert_eq!(catalog.tracks[0].catalog_duration(), std::time::Duration::ZERO);
}

#[test]
fn load_reads_catalog_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, sample_json()).unwrap();

    let catalog = Catalog::load(&path).unwrap();
    assert_eq!(catalog.tracks[0].id, "moonlight-1");

    assert!(matches!(
        Catalog::load(&dir.path().join("missing.json")),
        Err(CatalogError::Io(_))
    ));
}
