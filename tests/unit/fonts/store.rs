use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "swfsvg_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn outline(d: &str) -> GlyphOutline {
    GlyphOutline { d: d.to_string() }
}

#[test]
fn memory_store_is_append_only_and_counts_reads() {
    let store = MemoryGlyphStore::new();
    let font = store.font("Arial").unwrap();
    font.add_glyph(65, &outline("M0 0 L1 1")).unwrap();
    font.add_glyph(65, &outline("M9 9")).unwrap();
    assert_eq!(font.glyph(65).unwrap(), Some(outline("M0 0 L1 1")));
    assert_eq!(font.glyph(66).unwrap(), None);
    assert_eq!(store.glyph_reads(), 2);
    font.add_advance(65, 512.0);
    font.add_advance(65, 1.0);
    assert_eq!(font.advance(65), Some(512.0));
    assert_eq!(store.font_names(), ["Arial"]);
}

#[test]
fn dir_store_persists_glyphs_and_advances() {
    let root = temp_dir("dir_store");
    {
        let store = DirGlyphStore::open(&root);
        let font = store.font("Tahoma").unwrap();
        assert!(!font.has_glyph(1049));
        font.add_glyph(1049, &outline("M0 0 L10 0 10 10")).unwrap();
        font.add_advance(1049, 1100.0);
        font.flush().unwrap();
    }
    assert!(root.join("Tahoma").join("1049.svg").is_file());
    assert!(root.join("Tahoma").join("advances.json").is_file());

    let reopened = DirGlyphStore::open(&root);
    let font = reopened.font("Tahoma").unwrap();
    assert!(font.has_glyph(1049));
    assert_eq!(font.glyph(1049).unwrap(), Some(outline("M0 0 L10 0 10 10")));
    assert_eq!(font.advance(1049), Some(1100.0));
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn dir_store_never_overwrites_existing_glyph_files() {
    let root = temp_dir("no_overwrite");
    let first = DirGlyphStore::open(&root);
    first.font("F").unwrap().add_glyph(7, &outline("M1 1")).unwrap();

    let second = DirGlyphStore::open(&root);
    let font = second.font("F").unwrap();
    font.add_glyph(7, &outline("M2 2")).unwrap();
    assert_eq!(font.glyph(7).unwrap(), Some(outline("M1 1")));
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn corrupt_glyph_file_reports_store_unavailable() {
    let root = temp_dir("corrupt");
    std::fs::create_dir_all(root.join("F")).unwrap();
    std::fs::write(root.join("F").join("65.svg"), "<svg><g/></svg>").unwrap();
    std::fs::write(root.join("F").join("notes.txt"), "ignored").unwrap();
    let store = DirGlyphStore::open(&root);
    let font = store.font("F").unwrap();
    assert!(font.has_glyph(65));
    let err = font.glyph(65).unwrap_err();
    assert!(matches!(err, ExportError::GlyphStoreUnavailable(_)));
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn font_names_cannot_escape_the_root() {
    assert_eq!(sanitize_font_name("a/b"), "a_b");
    assert_eq!(sanitize_font_name(".."), "__");
    assert_eq!(sanitize_font_name(""), "_");
}

#[test]
fn dir_store_flush_keeps_advances_from_other_writers() {
    let root = temp_dir("dir_store_merge");
    let a = DirGlyphStore::open(&root);
    let b = DirGlyphStore::open(&root);
    let font_a = a.font("Verdana").unwrap();
    let font_b = b.font("Verdana").unwrap();

    font_a.add_advance(65, 1024.0);
    font_a.flush().unwrap();
    font_b.add_advance(66, 2048.0);
    font_b.add_advance(65, 1.0);
    font_b.flush().unwrap();

    let font = DirGlyphStore::open(&root).font("Verdana").unwrap();
    assert_eq!(font.advance(65), Some(1024.0));
    assert_eq!(font.advance(66), Some(2048.0));
    assert_eq!(font_b.advance(65), Some(1024.0));
}
