use log::debug;
use std::ops::{Deref, DerefMut};

use crate::rect::RealPoint;
use crate::traits::{Roi, RoiId};

type ChangeListener = Box<dyn FnMut(&[RoiId])>;

/// What a panel shows for the current selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSummary {
    /// Opacity of the first selected ROI, `None` when nothing is selected
    pub opacity: Option<f32>,
    /// Whether any selected ROI may be removed
    pub can_remove: bool,
    /// Whether exactly one ROI is selected and its overlay has an options panel
    pub has_options: bool,
}

/// Owner of a set of ROIs and of their change notifications.
///
/// Mutations made inside an update bracket are reported once, when the
/// outermost bracket closes.
#[derive(Default)]
pub struct RoiDocument {
    rois: Vec<Box<dyn Roi>>,
    update_depth: usize,
    pending: Vec<RoiId>,
    listeners: Vec<ChangeListener>,
}

impl RoiDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, roi: Box<dyn Roi>) -> RoiId {
        let id = roi.id();
        self.rois.push(roi);
        self.mark_changed(id);
        id
    }

    pub fn get(&self, id: RoiId) -> Option<&dyn Roi> {
        self.rois.iter().find(|roi| roi.id() == id).map(|roi| roi.as_ref())
    }

    pub fn get_mut(&mut self, id: RoiId) -> Option<&mut Box<dyn Roi>> {
        self.rois.iter_mut().find(|roi| roi.id() == id)
    }

    pub fn len(&self) -> usize {
        self.rois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rois.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Roi> {
        self.rois.iter().map(|roi| roi.as_ref())
    }

    pub fn ids(&self) -> Vec<RoiId> {
        self.rois.iter().map(|roi| roi.id()).collect()
    }

    pub fn rois(&self) -> &[Box<dyn Roi>] {
        &self.rois
    }

    /// Remove a ROI that allows it; others stay in place and `None` is returned
    pub fn remove(&mut self, id: RoiId) -> Option<Box<dyn Roi>> {
        let index = self
            .rois
            .iter()
            .position(|roi| roi.id() == id && roi.attributes().can_be_removed())?;
        let roi = self.rois.remove(index);
        self.mark_changed(id);
        Some(roi)
    }

    /// Register a callback receiving the ids changed by each flush
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&[RoiId]) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Open an update bracket; it closes when the guard is dropped
    pub fn begin_update(&mut self) -> UpdateGuard<'_> {
        self.update_depth += 1;
        UpdateGuard { document: self }
    }

    pub fn is_updating(&self) -> bool {
        self.update_depth > 0
    }

    fn end_update(&mut self) {
        self.update_depth = self.update_depth.saturating_sub(1);
        if self.update_depth == 0 {
            self.flush();
        }
    }

    /// Record a change to `id`, delivered now or when the open bracket closes
    pub fn mark_changed(&mut self, id: RoiId) {
        if !self.pending.contains(&id) {
            self.pending.push(id);
        }
        if self.update_depth == 0 {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let changed = std::mem::take(&mut self.pending);
        debug!("flushing {} roi change(s)", changed.len());

        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener(&changed);
        }
        // put the notified listeners back ahead of any registered meanwhile
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }

    pub fn summarize(&self, selection: &[RoiId]) -> SelectionSummary {
        let selected: Vec<&dyn Roi> = selection.iter().filter_map(|&id| self.get(id)).collect();

        let opacity = selected.first().map(|roi| roi.attributes().opacity());
        let can_remove = selected.iter().any(|roi| roi.attributes().can_be_removed());
        let has_options = match selected.as_slice() {
            [single] => single
                .overlay()
                .and_then(|overlay| overlay.options_panel())
                .is_some(),
            _ => false,
        };

        SelectionSummary {
            opacity,
            can_remove,
            has_options,
        }
    }

    /// Apply one opacity to every selected ROI within a single bracket
    pub fn set_opacity(&mut self, selection: &[RoiId], opacity: f32) {
        let mut doc = self.begin_update();
        for &id in selection {
            if let Some(roi) = doc.get_mut(id) {
                roi.attributes_mut().set_opacity(opacity);
                doc.mark_changed(id);
            }
        }
    }

    /// Translate every selected ROI that supports it; returns how many moved
    pub fn translate_selection(&mut self, selection: &[RoiId], delta: &RealPoint) -> usize {
        let mut doc = self.begin_update();
        let mut moved = 0;
        for &id in selection {
            let Some(roi) = doc.get_mut(id) else {
                continue;
            };
            if roi.attributes().is_read_only() || !roi.can_translate() {
                continue;
            }
            roi.translate(delta);
            doc.mark_changed(id);
            moved += 1;
        }
        moved
    }

    /// Remove every selected ROI that allows it
    pub fn remove_selection(&mut self, selection: &[RoiId]) -> Vec<Box<dyn Roi>> {
        let mut doc = self.begin_update();
        selection.iter().filter_map(|&id| doc.remove(id)).collect()
    }
}

/// Open update bracket on a [`RoiDocument`]
pub struct UpdateGuard<'a> {
    document: &'a mut RoiDocument,
}

impl Deref for UpdateGuard<'_> {
    type Target = RoiDocument;

    fn deref(&self) -> &RoiDocument {
        &*self.document
    }
}

impl DerefMut for UpdateGuard<'_> {
    fn deref_mut(&mut self) -> &mut RoiDocument {
        &mut *self.document
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.document.end_update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::{Rank, RealRect};
    use crate::shapes::BoxRoi;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn unit_box(x: f64) -> Box<dyn Roi> {
        Box::new(BoxRoi::new(RealRect::new(Rank::Two, &[x, 0.0], &[1.0, 1.0])))
    }

    fn recording(doc: &mut RoiDocument) -> Rc<RefCell<Vec<Vec<RoiId>>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        doc.on_change(move |ids| sink.borrow_mut().push(ids.to_vec()));
        log
    }

    #[test]
    fn bracket_batches_notifications() {
        let mut doc = RoiDocument::new();
        let a = doc.add(unit_box(0.0));
        let b = doc.add(unit_box(2.0));
        let log = recording(&mut doc);

        doc.set_opacity(&[a, b], 0.75);

        assert_eq!(log.borrow().as_slice(), &[vec![a, b]]);
        assert_eq!(doc.summarize(&[b, a]).opacity, Some(0.75));
        assert!(!doc.is_updating());
    }

    #[test]
    fn nested_brackets_flush_once() {
        let mut doc = RoiDocument::new();
        let a = doc.add(unit_box(0.0));
        let log = recording(&mut doc);

        {
            let mut outer = doc.begin_update();
            outer.set_opacity(&[a], 0.1);
            outer.mark_changed(a);
            assert!(log.borrow().is_empty());
        }
        assert_eq!(log.borrow().as_slice(), &[vec![a]]);
    }

    #[test]
    fn summary_reflects_selection() {
        let mut doc = RoiDocument::new();
        let a = doc.add(unit_box(0.0));
        let b = doc.add(unit_box(2.0));
        if let Some(roi) = doc.get_mut(a) {
            roi.attributes_mut().set_can_be_removed(false);
        }

        let none = doc.summarize(&[]);
        assert_eq!(none.opacity, None);
        assert!(!none.can_remove);

        assert!(!doc.summarize(&[a]).can_remove);
        assert!(doc.summarize(&[a, b]).can_remove);
        assert!(!doc.summarize(&[a]).has_options);
    }

    #[test]
    fn removal_is_gated() {
        let mut doc = RoiDocument::new();
        let a = doc.add(unit_box(0.0));
        let b = doc.add(unit_box(2.0));
        if let Some(roi) = doc.get_mut(a) {
            roi.attributes_mut().set_can_be_removed(false);
        }

        let removed = doc.remove_selection(&[a, b]);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id(), b);
        assert_eq!(doc.ids(), vec![a]);
    }

    #[test]
    fn translation_skips_read_only() {
        let mut doc = RoiDocument::new();
        let a = doc.add(unit_box(0.0));
        let b = doc.add(unit_box(2.0));
        if let Some(roi) = doc.get_mut(b) {
            roi.attributes_mut().set_read_only(true);
        }

        let moved = doc.translate_selection(&[a, b], &RealPoint::new(Rank::Two, &[3.0, 1.0]));
        assert_eq!(moved, 1);
        assert_eq!(doc.get(a).map(|roi| roi.position().coords().to_vec()), Some(vec![3, 1]));
        assert_eq!(doc.get(b).map(|roi| roi.position().coords().to_vec()), Some(vec![2, 0]));
    }
}
