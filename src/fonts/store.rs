//! Cross-document glyph store: outlines and advances keyed by font name and character code.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::foundation::error::{ExportError, ExportResult};
use crate::svg::document::{Element, SVG_NS};

/// Minimal glyph outline: path data in font-export space (pixels of a 20480-unit em).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphOutline {
    /// SVG path data.
    pub d: String,
}

/// Durable glyph cache shared by many export runs.
///
/// Implementations must tolerate concurrent readers and appenders; entries are never replaced.
pub trait GlyphStore: Send + Sync {
    /// Handle for `name`, created empty when unknown.
    fn font(&self, name: &str) -> ExportResult<Arc<dyn FontHandle>>;
}

/// One font inside a [`GlyphStore`].
pub trait FontHandle: Send + Sync {
    /// `true` when an outline for `code` exists.
    fn has_glyph(&self, code: u32) -> bool;
    /// Store an outline unless one already exists.
    fn add_glyph(&self, code: u32, outline: &GlyphOutline) -> ExportResult<()>;
    /// Stored outline for `code`.
    fn glyph(&self, code: u32) -> ExportResult<Option<GlyphOutline>>;
    /// Record an advance (font units) unless one already exists.
    fn add_advance(&self, code: u32, advance: f64);
    /// Recorded advance for `code`.
    fn advance(&self, code: u32) -> Option<f64>;
    /// Persist pending advances.
    fn flush(&self) -> ExportResult<()>;
}

const ADVANCES_FILE: &str = "advances.json";

static TMP_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Glyph store laid out as `<root>/<font name>/<code>.svg` plus `<root>/<font name>/advances.json`.
#[derive(Debug)]
pub struct DirGlyphStore {
    root: PathBuf,
    fonts: Mutex<HashMap<String, Arc<DirFont>>>,
}

impl DirGlyphStore {
    /// Open (or lazily create) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fonts: Mutex::new(HashMap::new()),
        }
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl GlyphStore for DirGlyphStore {
    fn font(&self, name: &str) -> ExportResult<Arc<dyn FontHandle>> {
        let mut fonts = self.fonts.lock();
        if let Some(font) = fonts.get(name) {
            return Ok(font.clone());
        }
        let font = Arc::new(DirFont::open(self.root.join(sanitize_font_name(name)))?);
        fonts.insert(name.to_string(), font.clone());
        Ok(font)
    }
}

fn sanitize_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "_".repeat(cleaned.len().max(1)),
        _ => cleaned,
    }
}

fn unavailable(path: &Path, e: impl std::fmt::Display) -> ExportError {
    ExportError::GlyphStoreUnavailable(format!("'{}': {e}", path.display()))
}

#[derive(Debug)]
struct DirFont {
    dir: PathBuf,
    glyph_paths: RwLock<HashMap<u32, PathBuf>>,
    glyphs: RwLock<HashMap<u32, GlyphOutline>>,
    advances: Mutex<BTreeMap<u32, f64>>,
}

impl DirFont {
    fn open(dir: PathBuf) -> ExportResult<Self> {
        let mut glyph_paths = HashMap::new();
        if dir.is_dir() {
            let entries = std::fs::read_dir(&dir).map_err(|e| unavailable(&dir, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| unavailable(&dir, e))?;
                let path = entry.path();
                let Some(code) = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.strip_suffix(".svg"))
                    .and_then(|stem| stem.parse::<u32>().ok())
                else {
                    continue;
                };
                glyph_paths.insert(code, path);
            }
        }
        let advances = read_advances(&dir.join(ADVANCES_FILE))?;
        Ok(Self {
            dir,
            glyph_paths: RwLock::new(glyph_paths),
            glyphs: RwLock::new(HashMap::new()),
            advances: Mutex::new(advances),
        })
    }

    fn glyph_path(&self, code: u32) -> PathBuf {
        self.dir.join(format!("{code}.svg"))
    }
}

fn read_advances(path: &Path) -> ExportResult<BTreeMap<u32, f64>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let text = std::fs::read_to_string(path).map_err(|e| unavailable(path, e))?;
    let raw: BTreeMap<String, f64> =
        serde_json::from_str(&text).map_err(|e| unavailable(path, e))?;
    raw.into_iter()
        .map(|(k, v)| {
            k.parse::<u32>()
                .map(|code| (code, v))
                .map_err(|e| unavailable(path, format!("bad code '{k}': {e}")))
        })
        .collect()
}

/// Write `bytes` next to `path` and move it into place; an existing `path` is left untouched.
fn write_new_file(path: &Path, bytes: &[u8], replace: bool) -> ExportResult<()> {
    if !replace && path.exists() {
        return Ok(());
    }
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("glyph");
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = path.with_file_name(format!(".{file_name}.{}.{seq}.tmp", std::process::id()));
    std::fs::write(&tmp, bytes).map_err(|e| unavailable(&tmp, e))?;
    if !replace && path.exists() {
        let _ = std::fs::remove_file(&tmp);
        return Ok(());
    }
    std::fs::rename(&tmp, path).map_err(|e| unavailable(path, e))
}

fn glyph_file_markup(outline: &GlyphOutline) -> String {
    let svg = Element::new("svg")
        .with("xmlns", SVG_NS)
        .with("version", "1.1")
        .with_child(Element::new("path").with("d", outline.d.clone()));
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    svg.write_to(&mut out);
    out
}

fn parse_glyph_file(path: &Path) -> ExportResult<GlyphOutline> {
    let text = std::fs::read_to_string(path).map_err(|e| unavailable(path, e))?;
    let doc = roxmltree::Document::parse(&text).map_err(|e| unavailable(path, e))?;
    let d = doc
        .descendants()
        .find(|n| n.has_tag_name("path"))
        .and_then(|n| n.attribute("d"))
        .ok_or_else(|| unavailable(path, "no <path d=..> element"))?;
    Ok(GlyphOutline { d: d.to_string() })
}

impl FontHandle for DirFont {
    fn has_glyph(&self, code: u32) -> bool {
        self.glyph_paths.read().contains_key(&code)
    }

    fn add_glyph(&self, code: u32, outline: &GlyphOutline) -> ExportResult<()> {
        if self.has_glyph(code) {
            return Ok(());
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| unavailable(&self.dir, e))?;
        let path = self.glyph_path(code);
        write_new_file(&path, glyph_file_markup(outline).as_bytes(), false)?;
        self.glyph_paths.write().insert(code, path);
        self.glyphs.write().insert(code, outline.clone());
        Ok(())
    }

    fn glyph(&self, code: u32) -> ExportResult<Option<GlyphOutline>> {
        if let Some(g) = self.glyphs.read().get(&code) {
            return Ok(Some(g.clone()));
        }
        let Some(path) = self.glyph_paths.read().get(&code).cloned() else {
            return Ok(None);
        };
        let outline = parse_glyph_file(&path)?;
        self.glyphs.write().insert(code, outline.clone());
        Ok(Some(outline))
    }

    fn add_advance(&self, code: u32, advance: f64) {
        self.advances.lock().entry(code).or_insert(advance);
    }

    fn advance(&self, code: u32) -> Option<f64> {
        self.advances.lock().get(&code).copied()
    }

    /// Merge pending advances into `advances.json`.
    ///
    /// The file is re-read first so advances appended by other writers survive; codes already on
    /// disk keep their recorded value.
    fn flush(&self) -> ExportResult<()> {
        let mut advances = self.advances.lock();
        if advances.is_empty() {
            return Ok(());
        }
        let path = self.dir.join(ADVANCES_FILE);
        let on_disk = read_advances(&path)?;
        let missing = advances.keys().any(|code| !on_disk.contains_key(code));
        for (code, advance) in on_disk {
            advances.insert(code, advance);
        }
        if !missing {
            return Ok(());
        }
        let raw: BTreeMap<String, f64> = advances.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let json = serde_json::to_vec(&raw).map_err(|e| ExportError::serde(e.to_string()))?;
        std::fs::create_dir_all(&self.dir).map_err(|e| unavailable(&self.dir, e))?;
        write_new_file(&path, &json, true)
    }
}

/// In-process glyph store, useful for batch runs that share fonts without touching disk.
#[derive(Debug, Default)]
pub struct MemoryGlyphStore {
    fonts: Mutex<HashMap<String, Arc<MemoryFont>>>,
}

impl MemoryGlyphStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of [`FontHandle::glyph`] calls served so far.
    pub fn glyph_reads(&self) -> usize {
        self.fonts
            .lock()
            .values()
            .map(|f| f.reads.load(Ordering::Relaxed))
            .sum()
    }

    /// Font names with at least one handle.
    pub fn font_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.fonts.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl GlyphStore for MemoryGlyphStore {
    fn font(&self, name: &str) -> ExportResult<Arc<dyn FontHandle>> {
        let font = self
            .fonts
            .lock()
            .entry(name.to_string())
            .or_default()
            .clone();
        Ok(font)
    }
}

#[derive(Debug, Default)]
struct MemoryFont {
    glyphs: RwLock<HashMap<u32, GlyphOutline>>,
    advances: RwLock<HashMap<u32, f64>>,
    reads: AtomicUsize,
}

impl FontHandle for MemoryFont {
    fn has_glyph(&self, code: u32) -> bool {
        self.glyphs.read().contains_key(&code)
    }

    fn add_glyph(&self, code: u32, outline: &GlyphOutline) -> ExportResult<()> {
        self.glyphs
            .write()
            .entry(code)
            .or_insert_with(|| outline.clone());
        Ok(())
    }

    fn glyph(&self, code: u32) -> ExportResult<Option<GlyphOutline>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.glyphs.read().get(&code).cloned())
    }

    fn add_advance(&self, code: u32, advance: f64) {
        self.advances.write().entry(code).or_insert(advance);
    }

    fn advance(&self, code: u32) -> Option<f64> {
        self.advances.read().get(&code).copied()
    }

    fn flush(&self) -> ExportResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/store.rs"]
mod tests;
