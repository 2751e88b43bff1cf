use std::collections::{BTreeMap, HashMap};

use crate::compose::bitmap::{decode_bitmap, png_data_url};
use crate::compose::display_list::build_display_list;
use crate::compose::mask::MaskStack;
use crate::compose::text::{edit_text, static_text};
use crate::effects::filter::{MASK_WHITE_FILTER_ID, build_effects, mask_white_filter};
use crate::effects::paint::PaintRegistry;
use crate::export::options::ExportOptions;
use crate::fonts::cache::{GlyphCache, font_elem_id};
use crate::fonts::store::GlyphStore;
use crate::foundation::core::{Bounds, affine_is_finite, affine_to_svg};
use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::{
    BitmapDef, CharacterId, Depth, FillStyle, FontDef, Placement, Record, Scene, ShapeDef,
    ShapeRecord, ShapeStyles, SpriteDef,
};
use crate::shape::exporter::{collect_paths, render_paths, runs_bounds};
use crate::svg::document::{Document, Element, Node};

/// Frame composer: turns one frame of a [`Scene`] into a [`Document`].
///
/// A composer is cheap to build and holds no per-document state, so one instance can export any
/// number of frames and files.
pub struct Composer<'s> {
    options: ExportOptions,
    store: Option<&'s dyn GlyphStore>,
}

impl<'s> Composer<'s> {
    /// Composer with export options and an optional glyph store for glyphs missing from fonts.
    pub fn new(options: ExportOptions, store: Option<&'s dyn GlyphStore>) -> Self {
        Self { options, store }
    }

    /// Options in use.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Compose frame `frame` (0-based) of `scene`.
    #[tracing::instrument(skip(self, scene), fields(records = scene.records.len()))]
    pub fn compose(&self, scene: &Scene, frame: u32) -> ExportResult<Document> {
        scene.validate()?;
        let mut session = Session::new(scene, &self.options, self.store, frame);
        session.materialize_all(&scene.records)?;
        let list = build_display_list(&scene.records, frame);
        let (groups, _) = session.place_all(&list)?;
        let doc = session.finish(groups);
        tracing::debug!(
            defs = doc.defs.len(),
            recovered = doc.recovered.len(),
            "frame composed"
        );
        Ok(doc)
    }
}

/// Compose one frame with default options and no glyph store.
pub fn compose(scene: &Scene, frame: u32) -> ExportResult<Document> {
    Composer::new(ExportOptions::default(), None).compose(scene, frame)
}

/// Materialization state of one definition.
#[derive(Clone, Copy, Debug)]
enum Slot {
    InProgress,
    /// Exported; placeable definitions carry their bounds.
    Ready(Option<Bounds>),
    Failed,
}

struct Session<'a, 's> {
    options: &'a ExportOptions,
    pool: HashMap<CharacterId, &'a Record>,
    slots: HashMap<CharacterId, Slot>,
    frame: u32,
    doc: Document,
    paints: PaintRegistry,
    glyphs: GlyphCache<'s>,
    num_filters: usize,
    num_masks: usize,
    has_mask_white: bool,
}

fn index_definitions<'a>(records: &'a [Record], pool: &mut HashMap<CharacterId, &'a Record>) {
    for rec in records {
        if let Some(id) = rec.character_id() {
            pool.insert(id, rec);
        }
        if let Record::DefineSprite(sprite) = rec {
            index_definitions(&sprite.records, pool);
        }
    }
}

fn fill_bitmap(fill: &FillStyle) -> Option<CharacterId> {
    match fill {
        FillStyle::Bitmap { bitmap_id, .. } => Some(*bitmap_id),
        _ => None,
    }
}

fn style_bitmaps(styles: &ShapeStyles, out: &mut Vec<CharacterId>) {
    out.extend(styles.fill_styles.iter().filter_map(fill_bitmap));
    out.extend(
        styles
            .line_styles
            .iter()
            .filter_map(|l| l.fill.as_ref().and_then(fill_bitmap)),
    );
}

/// Bitmaps a shape paints with, in table order.
fn shape_bitmaps(def: &ShapeDef) -> Vec<CharacterId> {
    let mut out = Vec::new();
    style_bitmaps(&def.styles, &mut out);
    for rec in &def.records {
        if let ShapeRecord::StyleChange(sc) = rec
            && let Some(styles) = &sc.new_styles
        {
            style_bitmaps(styles, &mut out);
        }
    }
    out
}

fn char_id(id: CharacterId) -> String {
    format!("c{id}")
}

impl<'a, 's> Session<'a, 's> {
    fn new(
        scene: &'a Scene,
        options: &'a ExportOptions,
        store: Option<&'s dyn GlyphStore>,
        frame: u32,
    ) -> Self {
        let mut pool = HashMap::new();
        index_definitions(&scene.records, &mut pool);
        Self {
            options,
            pool,
            slots: HashMap::new(),
            frame,
            doc: Document::new(scene.header.frame_size.to_bounds(), options.margin),
            paints: PaintRegistry::new(),
            glyphs: GlyphCache::new(store),
            num_filters: 0,
            num_masks: 0,
            has_mask_white: false,
        }
    }

    fn materialize_all(&mut self, records: &'a [Record]) -> ExportResult<()> {
        for rec in records {
            if let Some(id) = rec.character_id() {
                self.materialize(id)?;
            }
        }
        Ok(())
    }

    /// Export definition `id` into `defs` once. Unknown ids are left for the caller to report.
    fn materialize(&mut self, id: CharacterId) -> ExportResult<()> {
        match self.slots.get(&id) {
            Some(Slot::InProgress) => return Err(ExportError::CyclicDefinition { id }),
            Some(_) => return Ok(()),
            None => {}
        }
        let Some(&record) = self.pool.get(&id) else {
            return Ok(());
        };
        self.slots.insert(id, Slot::InProgress);
        let slot = match self.export_definition(record) {
            Ok(bounds) => Slot::Ready(bounds),
            Err(e @ ExportError::Image(_)) => {
                tracing::warn!(id, error = %e, "definition skipped");
                self.doc.recovered.push(e);
                Slot::Failed
            }
            Err(e) => return Err(e),
        };
        self.slots.insert(id, slot);
        Ok(())
    }

    /// Bounds of a placeable definition, materializing it first when needed.
    fn placeable(&mut self, id: CharacterId) -> ExportResult<Option<Bounds>> {
        self.materialize(id)?;
        Ok(match self.slots.get(&id) {
            Some(Slot::Ready(bounds)) => *bounds,
            _ => None,
        })
    }

    fn font_def(&self, id: CharacterId) -> Option<&'a FontDef> {
        match self.pool.get(&id).copied() {
            Some(Record::DefineFont(font)) => Some(font),
            _ => None,
        }
    }

    fn export_definition(&mut self, record: &'a Record) -> ExportResult<Option<Bounds>> {
        match record {
            Record::DefineShape(def) => self.export_shape(def).map(Some),
            Record::DefineFont(def) => {
                let group = self.glyphs.export_font(def)?;
                self.doc.defs.push(group);
                Ok(None)
            }
            Record::DefineText(def) => {
                for font_id in def.records.iter().filter_map(|r| r.font_id) {
                    self.materialize(font_id)?;
                }
                self.doc.defs.push(static_text(def, &self.glyphs));
                Ok(Some(def.bounds.to_bounds()))
            }
            Record::DefineEditText(def) => {
                let font = match def.font_id {
                    Some(font_id) => {
                        self.materialize(font_id)?;
                        self.font_def(font_id)
                    }
                    None => None,
                };
                let group = edit_text(
                    def,
                    font,
                    &mut self.glyphs,
                    &self.options.layout,
                    &mut self.doc.recovered,
                );
                self.doc.defs.push(group);
                Ok(Some(def.bounds.to_bounds()))
            }
            Record::DefineBitmap(def) => self.export_bitmap(def).map(Some),
            Record::DefineSprite(def) => self.export_sprite(def).map(Some),
            Record::PlaceInstance(_) | Record::RemoveInstance(_) | Record::ShowFrame => Ok(None),
        }
    }

    fn export_shape(&mut self, def: &'a ShapeDef) -> ExportResult<Bounds> {
        for bitmap_id in shape_bitmaps(def) {
            self.materialize(bitmap_id)?;
        }
        let runs = collect_paths(def.id, &def.styles, &def.records)?;
        let bounds = runs_bounds(&runs);
        let paths = render_paths(
            &runs,
            &mut self.paints,
            self.options.shape_options(),
            &mut self.doc.recovered,
        );
        self.doc.defs.extend(self.paints.take_defs());

        let mut group = Element::new("g")
            .with("id", char_id(def.id))
            .with("data-type", "shape")
            .with("data-bounds", bounds.to_string());
        group.children.extend(paths.into_iter().map(Node::Element));
        self.doc.defs.push(group);
        Ok(bounds)
    }

    fn export_bitmap(&mut self, def: &BitmapDef) -> ExportResult<Bounds> {
        let mut image = Element::new("image")
            .with("id", char_id(def.id))
            .with("x", "0")
            .with("y", "0");
        let (width, height) = if self.options.embed_images {
            let rgba = decode_bitmap(def)?;
            let href = png_data_url(&rgba)?;
            let (w, h) = rgba.dimensions();
            image.set("width", w.to_string());
            image.set("height", h.to_string());
            image.set("xlink:href", href);
            (w, h)
        } else {
            image.set("width", def.width.to_string());
            image.set("height", def.height.to_string());
            (def.width, def.height)
        };
        self.paints.register_bitmap(def.id, width, height);
        self.doc.defs.push(image);
        Ok(Bounds::new(0.0, 0.0, f64::from(width), f64::from(height)))
    }

    fn export_sprite(&mut self, def: &'a SpriteDef) -> ExportResult<Bounds> {
        self.materialize_all(&def.records)?;
        let list = build_display_list(&def.records, self.frame);
        let (children, bounds) = self.place_all(&list)?;
        let bounds = bounds.unwrap_or_else(Bounds::zero).rounded();

        let mut group = Element::new("g")
            .with("id", char_id(def.id))
            .with("data-type", "sprite")
            .with("data-bounds", bounds.to_string());
        group.children.extend(children.into_iter().map(Node::Element));
        self.doc.defs.push(group);
        Ok(bounds)
    }

    /// Emit one timeline's instances in depth order.
    ///
    /// Returns the visible instance groups and the union of their transformed bounds.
    fn place_all(
        &mut self,
        list: &BTreeMap<Depth, Placement>,
    ) -> ExportResult<(Vec<Element>, Option<Bounds>)> {
        let mut masks = MaskStack::new();
        let mut out = Vec::with_capacity(list.len());
        let mut bounds: Option<Bounds> = None;

        for (&depth, placement) in list {
            let Some(id) = placement.character_id else {
                continue;
            };
            let Some(char_bounds) = self.placeable(id)? else {
                tracing::warn!(id, depth, "skipping instance of unresolved character");
                self.doc
                    .recovered
                    .push(ExportError::UnresolvedCharacter { id });
                continue;
            };

            let affine = placement.matrix.unwrap_or_default().to_affine();
            if !affine_is_finite(affine) {
                return Err(ExportError::malformed_transform(
                    id,
                    "non-finite matrix coefficient",
                ));
            }
            let mut reference = Element::new("use").with("xlink:href", format!("#{}", char_id(id)));
            if placement.matrix.is_some() {
                reference.set("transform", affine_to_svg(affine));
            }
            if let Some(filter_id) = self.instance_filter(placement) {
                reference.set("filter", format!("url(#{filter_id})"));
            }

            if let Some(ceiling) = placement.clip_depth {
                let mask_id = self.push_mask(reference);
                masks.enter(ceiling, mask_id);
                continue;
            }

            let mut group = Element::new("g");
            if let Some(mask_id) = masks.classify(depth) {
                group.set("mask", format!("url(#{mask_id})"));
            }
            group.push(reference);
            out.push(group);

            let placed = char_bounds.transform(affine);
            bounds = Some(bounds.map_or(placed, |b| b.union(placed)));
        }
        Ok((out, bounds))
    }

    fn instance_filter(&mut self, placement: &Placement) -> Option<String> {
        let filters = placement.filters.as_deref().unwrap_or(&[]);
        let graph = build_effects(
            placement.color_transform.as_ref(),
            filters,
            &mut self.doc.recovered,
        )?;
        self.num_filters += 1;
        let id = format!("filter{}", self.num_filters);
        self.doc.defs.push(graph.to_element(&id));
        Some(id)
    }

    /// Render a clip instance into a new `<mask>`; its content is painted opaque white.
    fn push_mask(&mut self, content: Element) -> String {
        if !self.has_mask_white {
            self.doc.defs.push(mask_white_filter());
            self.has_mask_white = true;
        }
        self.num_masks += 1;
        let id = format!("mask{}", self.num_masks);
        let mask = Element::new("mask").with("id", id.clone()).with_child(
            Element::new("g")
                .with("filter", format!("url(#{MASK_WHITE_FILTER_ID})"))
                .with_child(content),
        );
        self.doc.defs.push(mask);
        id
    }

    fn finish(mut self, groups: Vec<Element>) -> Document {
        for (font_id, path) in self.glyphs.take_materialized() {
            match self.doc.def_mut(&font_elem_id(font_id)) {
                Some(group) => group.push(path),
                None => tracing::warn!(font_id, "materialized glyph without font group"),
            }
        }
        self.doc
            .root
            .children
            .extend(groups.into_iter().map(Node::Element));
        self.doc
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/composer.rs"]
mod tests;
