/// Maps in the competitive pool, as offered by the match form.
///
/// The store accepts any map name; this list only feeds the dashboard select.
pub const MAP_POOL: &[&str] = &[
    "Kafe Dostoyevsky",
    "Consulate",
    "Clubhouse",
    "Border",
    "Coastline",
    "Chalet",
    "Lair",
    "Nighthaven Labs",
    "Emerald Plains",
    "Bank",
    "Kanal",
    "Oregon",
    "Outback",
    "Skyscraper",
    "Theme Park",
    "Villa",
];

pub fn get_maps() -> &'static [&'static str] {
    MAP_POOL
}
