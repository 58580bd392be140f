use crate::render::primitives::Color;

/// Tableau-10 categorical palette.
pub const TABLEAU_10: [u32; 10] = [
    0x4e79a7, 0xf28e2b, 0xe15759, 0x76b7b2, 0x59a14f, 0xedc948, 0xb07aa1, 0xff9da7, 0x9c755f,
    0xbab0ac,
];

/// One categorical colour per series, assigned in series order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    names: Vec<Option<String>>,
}

impl ColorScale {
    #[must_use]
    pub fn new(names: Vec<Option<String>>) -> Self {
        Self { names }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Colour of the series at `index`; the palette cycles past ten series.
    #[must_use]
    pub fn color(&self, index: usize) -> Color {
        Color::from_hex(TABLEAU_10[index % TABLEAU_10.len()])
    }

    /// Colour of the first series called `name`.
    #[must_use]
    pub fn color_for(&self, name: &str) -> Option<Color> {
        self.names
            .iter()
            .position(|entry| entry.as_deref() == Some(name))
            .map(|index| self.color(index))
    }
}

#[cfg(test)]
mod tests {
    use super::ColorScale;

    #[test]
    fn colors_follow_series_order_and_cycle() {
        let scale = ColorScale::new(vec![Some("a".to_owned()), Some("b".to_owned())]);
        assert_eq!(scale.color(0).to_hex(), "#4e79a7");
        assert_eq!(scale.color_for("b"), Some(scale.color(1)));
        assert_eq!(scale.color(10), scale.color(0));
        assert_eq!(scale.color_for("missing"), None);
    }
}
