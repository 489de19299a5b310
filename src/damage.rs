//! Redraw hints
//!
//! Paints invalidate small regions; clears and reconfigures invalidate
//! everything. Regions are coalesced into one bounding rectangle until the
//! renderer takes them.

use crate::canvas::Rect;

/// Part of the canvas that is stale on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Damage {
    /// Nothing to recomposite
    #[default]
    None,
    /// Bounding rectangle of all invalidated areas
    Region(Rect),
    /// The whole canvas
    Full,
}

impl Damage {
    /// Merge an invalidated rectangle into the pending damage
    pub fn add(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        *self = match *self {
            Damage::None => Damage::Region(rect),
            Damage::Region(r) => Damage::Region(r.union(&rect)),
            Damage::Full => Damage::Full,
        };
    }

    pub fn add_full(&mut self) {
        *self = Damage::Full;
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Damage::None)
    }

    /// Take the pending damage, leaving `None` behind
    pub fn take(&mut self) -> Damage {
        std::mem::take(self)
    }

    /// Resolve to a concrete rectangle within `bounds`
    pub fn clip_to(&self, bounds: Rect) -> Option<Rect> {
        match self {
            Damage::None => None,
            Damage::Region(r) => r.intersect(&bounds),
            Damage::Full => (!bounds.is_empty()).then_some(bounds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_coalesce_to_bounding_rect() {
        let mut damage = Damage::None;
        damage.add(Rect::new(47, 47, 53, 53));
        damage.add(Rect::new(52, 47, 58, 53));
        assert_eq!(damage, Damage::Region(Rect::new(47, 47, 58, 53)));
    }

    #[test]
    fn full_absorbs_regions() {
        let mut damage = Damage::None;
        damage.add_full();
        damage.add(Rect::new(0, 0, 2, 2));
        assert_eq!(damage, Damage::Full);
    }

    #[test]
    fn take_resets() {
        let mut damage = Damage::Full;
        assert_eq!(damage.take(), Damage::Full);
        assert!(damage.is_none());
    }

    #[test]
    fn clip_to_bounds() {
        let bounds = Rect::of_size(100, 100);
        assert_eq!(
            Damage::Region(Rect::new(-3, -3, 3, 3)).clip_to(bounds),
            Some(Rect::new(0, 0, 3, 3))
        );
        assert_eq!(Damage::Region(Rect::new(200, 0, 206, 6)).clip_to(bounds), None);
        assert_eq!(Damage::Full.clip_to(bounds), Some(bounds));
        assert_eq!(Damage::None.clip_to(bounds), None);
    }

    #[test]
    fn empty_rect_is_ignored() {
        let mut damage = Damage::None;
        damage.add(Rect::new(5, 5, 5, 9));
        assert!(damage.is_none());
    }
}
