use eframe::egui::Color32;
use palette::Srgb;
use palette::named;

// ---------------------------------------------------------------------------
// Bar colours
// ---------------------------------------------------------------------------

/// Fixed bar palette, one colour per crime type in correlation order.
const BAR_PALETTE: [Srgb<u8>; 10] = [
    named::BLUE,
    named::ORANGE,
    named::GREEN,
    named::RED,
    named::PURPLE,
    named::LIMEGREEN,
    named::CADETBLUE,
    named::DARKRED,
    named::CYAN,
    named::ORANGERED,
];

/// Colour of the `index`-th bar, cycling through the palette.
pub fn bar_color(index: usize) -> [u8; 3] {
    let c = BAR_PALETTE[index % BAR_PALETTE.len()];
    [c.red, c.green, c.blue]
}

/// Convert a stored RGB triple to an egui colour.
pub fn to_color32(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Colour of the floor baseline on trend charts.
pub fn floor_color() -> Color32 {
    let c = named::GRAY;
    Color32::from_rgb(c.red, c.green, c.blue)
}
