//! Outline highlighting: which object is looked at, and how it is drawn.
//!
//! # Detection
//!
//! Every frame the host sphere-casts from the viewer along its forward axis.
//! [`nearest_hit`] reduces the raw hits to one, and [`OutlineDetector`]
//! turns the hit sequence into enable/disable edges so that at most one
//! object is outlined at a time.
//!
//! ```
//! use escape_logic::outline::{HighlightChange, OutlineDetector};
//!
//! let mut det = OutlineDetector::new();
//! assert_eq!(det.observe(Some(1)), HighlightChange { disable: None, enable: Some(1) });
//! assert_eq!(det.observe(Some(1)), HighlightChange::default());
//! assert_eq!(det.observe(None), HighlightChange { disable: Some(1), enable: None });
//! ```
//!
//! # Rendering
//!
//! Highlighting appends a mask pass and a fill pass to each renderer of the
//! target, never twice. Their depth tests and fill width come from the
//! [`OutlineMode`].

use serde::{Deserialize, Serialize};

use crate::constants::outline;

/// A raw sphere-cast hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<Id> {
    pub id: Id,
    pub distance: f32,
}

/// Closest hit, ties broken by the smaller id.
pub fn nearest_hit<Id: Ord + Copy>(hits: &[RayHit<Id>]) -> Option<RayHit<Id>> {
    hits.iter().copied().min_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.id.cmp(&b.id))
    })
}

/// Edges to apply after observing one frame's hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightChange<Id> {
    pub disable: Option<Id>,
    pub enable: Option<Id>,
}

impl<Id> Default for HighlightChange<Id> {
    fn default() -> Self {
        Self {
            disable: None,
            enable: None,
        }
    }
}

impl<Id> HighlightChange<Id> {
    pub fn is_empty(&self) -> bool {
        self.disable.is_none() && self.enable.is_none()
    }
}

/// Tracks the single outlined object across frames.
#[derive(Debug, Clone, Default)]
pub struct OutlineDetector<Id> {
    current: Option<Id>,
}

impl<Id: Copy + PartialEq> OutlineDetector<Id> {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn current(&self) -> Option<Id> {
        self.current
    }

    /// Feed this frame's outline candidate under the crosshair, or `None` if
    /// the cast missed or hit something that can't be outlined.
    pub fn observe(&mut self, hit: Option<Id>) -> HighlightChange<Id> {
        if hit == self.current {
            return HighlightChange::default();
        }
        let change = HighlightChange {
            disable: self.current,
            enable: hit,
        };
        self.current = hit;
        change
    }
}

/// Anything that can be outlined.
pub trait Highlightable {
    fn enable_highlight(&mut self);
    fn disable_highlight(&mut self);
    fn is_highlighted(&self) -> bool;
}

/// Depth comparison for a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthTest {
    Always,
    LessEqual,
    Greater,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutlineMode {
    #[default]
    OutlineAll,
    OutlineVisible,
    OutlineHidden,
    OutlineAndSilhouette,
    SilhouetteOnly,
}

/// Uniforms for the two outline passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassSettings {
    pub mask_depth: DepthTest,
    pub fill_depth: DepthTest,
    pub fill_width: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineStyle {
    pub mode: OutlineMode,
    pub color: [f32; 4],
    pub width: f32,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            mode: OutlineMode::default(),
            color: outline::DEFAULT_COLOR,
            width: outline::DEFAULT_WIDTH,
        }
    }
}

impl OutlineStyle {
    pub fn settings(&self) -> PassSettings {
        use DepthTest::*;
        let width = self.width.clamp(0.0, outline::MAX_WIDTH);
        let (mask_depth, fill_depth, fill_width) = match self.mode {
            OutlineMode::OutlineAll => (Always, Always, width),
            OutlineMode::OutlineVisible => (Always, LessEqual, width),
            OutlineMode::OutlineHidden => (Always, Greater, width),
            OutlineMode::OutlineAndSilhouette => (LessEqual, Always, width),
            OutlineMode::SilhouetteOnly => (LessEqual, Greater, 0.0),
        };
        PassSettings {
            mask_depth,
            fill_depth,
            fill_width,
            color: self.color,
        }
    }
}

/// One renderer's ordered material passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSet {
    pub passes: Vec<String>,
}

impl MaterialSet {
    pub fn new(passes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            passes: passes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_outline(&self) -> bool {
        self.passes.iter().any(|p| p == outline::MASK_PASS)
    }

    fn add_outline(&mut self) {
        if !self.has_outline() {
            self.passes.push(outline::MASK_PASS.to_string());
            self.passes.push(outline::FILL_PASS.to_string());
        }
    }

    fn remove_outline(&mut self) {
        for name in [outline::MASK_PASS, outline::FILL_PASS] {
            if let Some(i) = self.passes.iter().position(|p| p == name) {
                self.passes.remove(i);
            }
        }
    }
}

/// An outlinable object: its renderers and style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineTarget {
    pub renderers: Vec<MaterialSet>,
    style: OutlineStyle,
    settings: Option<PassSettings>,
    highlighted: bool,
}

impl OutlineTarget {
    pub fn new(renderers: Vec<MaterialSet>, style: OutlineStyle) -> Self {
        Self {
            renderers,
            style,
            settings: None,
            highlighted: false,
        }
    }

    pub fn style(&self) -> OutlineStyle {
        self.style
    }

    /// Restyle; pass settings are rederived on next use.
    pub fn set_style(&mut self, style: OutlineStyle) {
        if style != self.style {
            self.style = style;
            self.settings = None;
        }
    }

    /// Current pass settings, rederiving them if the style changed. Returns
    /// `Some` only when they were (re)computed.
    pub fn refresh_settings(&mut self) -> Option<PassSettings> {
        if self.settings.is_some() {
            return None;
        }
        let settings = self.style.settings();
        self.settings = Some(settings);
        Some(settings)
    }
}

impl Highlightable for OutlineTarget {
    fn enable_highlight(&mut self) {
        for r in &mut self.renderers {
            r.add_outline();
        }
        self.highlighted = true;
    }

    fn disable_highlight(&mut self) {
        for r in &mut self.renderers {
            r.remove_outline();
        }
        self.highlighted = false;
    }

    fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_sequence_keeps_single_highlight() {
        let mut det = OutlineDetector::new();
        let mut lit: Option<char> = None;
        let frames = [Some('A'), Some('A'), Some('B'), None, Some('A')];
        let expected = [Some('A'), Some('A'), Some('B'), None, Some('A')];

        for (hit, want) in frames.iter().zip(expected) {
            let change = det.observe(*hit);
            if let Some(off) = change.disable {
                assert_eq!(lit, Some(off));
                lit = None;
            }
            if let Some(on) = change.enable {
                assert!(lit.is_none(), "two highlights at once");
                lit = Some(on);
            }
            assert_eq!(lit, want);
            assert_eq!(det.current(), want);
        }
    }

    #[test]
    fn nearest_hit_breaks_ties_by_id() {
        let hits = [
            RayHit { id: 9, distance: 4.0 },
            RayHit { id: 5, distance: 4.0 },
            RayHit { id: 1, distance: 7.0 },
        ];
        assert_eq!(nearest_hit(&hits).map(|h| h.id), Some(5));
        assert!(nearest_hit::<u32>(&[]).is_none());
    }

    #[test]
    fn enable_does_not_duplicate_passes() {
        let mut t = OutlineTarget::new(vec![MaterialSet::new(["Rust"])], OutlineStyle::default());
        t.enable_highlight();
        t.enable_highlight();
        assert_eq!(t.renderers[0].passes.len(), 3);
        assert!(t.is_highlighted());
        t.disable_highlight();
        assert_eq!(t.renderers[0].passes, vec!["Rust".to_string()]);
        assert!(!t.is_highlighted());
    }

    #[test]
    fn silhouette_only_has_no_width() {
        let style = OutlineStyle {
            mode: OutlineMode::SilhouetteOnly,
            ..OutlineStyle::default()
        };
        let s = style.settings();
        assert_eq!(s.fill_width, 0.0);
        assert_eq!(s.mask_depth, DepthTest::LessEqual);
        assert_eq!(s.fill_depth, DepthTest::Greater);
    }

    #[test]
    fn width_is_clamped() {
        let style = OutlineStyle {
            width: 40.0,
            ..OutlineStyle::default()
        };
        assert_eq!(style.settings().fill_width, outline::MAX_WIDTH);
    }

    #[test]
    fn settings_rederived_after_restyle() {
        let mut t = OutlineTarget::new(vec![], OutlineStyle::default());
        assert!(t.refresh_settings().is_some());
        assert!(t.refresh_settings().is_none());
        t.set_style(OutlineStyle {
            mode: OutlineMode::OutlineHidden,
            ..OutlineStyle::default()
        });
        let s = t.refresh_settings().expect("restyled");
        assert_eq!(s.fill_depth, DepthTest::Greater);
    }
}
