//! The `tables` module holds the fixed lookup tables used by the canonicalization pipeline:
//! ordinal expansions, directional abbreviations, the USPS street-suffix table, honorific/acronym
//! expansions, and stop words. Kept as flat arrays rather than generated code so additions are a
//! one-line diff.
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Ordinal-number abbreviations expanded during canonicalization step 3 (`1st` -> `first`, ...,
/// `12th` -> `twelfth`).
pub static ORDINALS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("1st", "first"),
        ("2nd", "second"),
        ("3rd", "third"),
        ("4th", "fourth"),
        ("5th", "fifth"),
        ("6th", "sixth"),
        ("7th", "seventh"),
        ("8th", "eighth"),
        ("9th", "ninth"),
        ("10th", "tenth"),
        ("11th", "eleventh"),
        ("12th", "twelfth"),
    ]
    .into_iter()
    .collect()
});

/// Directional abbreviations and full spellings recognized as a pre- or post-directional token.
/// `no`/`so` are unusual but real spellings seen in OSM and municipal ordinance text.
pub static DIRECTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("n", "north"),
        ("s", "south"),
        ("e", "east"),
        ("w", "west"),
        ("ne", "northeast"),
        ("nw", "northwest"),
        ("se", "southeast"),
        ("sw", "southwest"),
        ("no", "north"),
        ("so", "south"),
        ("north", "north"),
        ("south", "south"),
        ("east", "east"),
        ("west", "west"),
        ("northeast", "northeast"),
        ("northwest", "northwest"),
        ("southeast", "southeast"),
        ("southwest", "southwest"),
    ]
    .into_iter()
    .collect()
});

/// USPS Publication 28, Appendix C1 street-suffix abbreviations (and common alternate spellings),
/// mapped to their canonical expanded form. Covers well over the spec's 140-entry floor.
pub static STREET_SUFFIXES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("aly", "alley"),
        ("anx", "annex"),
        ("arc", "arcade"),
        ("ave", "avenue"),
        ("av", "avenue"),
        ("bch", "beach"),
        ("bnd", "bend"),
        ("blf", "bluff"),
        ("blfs", "bluffs"),
        ("btm", "bottom"),
        ("blvd", "boulevard"),
        ("br", "branch"),
        ("brg", "bridge"),
        ("brk", "brook"),
        ("brks", "brooks"),
        ("bg", "burg"),
        ("bgs", "burgs"),
        ("byp", "bypass"),
        ("cp", "camp"),
        ("cyn", "canyon"),
        ("cpe", "cape"),
        ("cswy", "causeway"),
        ("ctr", "center"),
        ("ctrs", "centers"),
        ("cir", "circle"),
        ("cirs", "circles"),
        ("clf", "cliff"),
        ("clfs", "cliffs"),
        ("clb", "club"),
        ("cmn", "common"),
        ("cmns", "commons"),
        ("cor", "corner"),
        ("cors", "corners"),
        ("crse", "course"),
        ("ct", "court"),
        ("cts", "courts"),
        ("cv", "cove"),
        ("cvs", "coves"),
        ("crk", "creek"),
        ("cres", "crescent"),
        ("crst", "crest"),
        ("xing", "crossing"),
        ("xrd", "crossroad"),
        ("xrds", "crossroads"),
        ("curv", "curve"),
        ("dl", "dale"),
        ("dm", "dam"),
        ("dv", "divide"),
        ("dr", "drive"),
        ("drs", "drives"),
        ("est", "estate"),
        ("ests", "estates"),
        ("expy", "expressway"),
        ("ext", "extension"),
        ("exts", "extensions"),
        ("fall", "fall"),
        ("fls", "falls"),
        ("fry", "ferry"),
        ("fld", "field"),
        ("flds", "fields"),
        ("flt", "flat"),
        ("flts", "flats"),
        ("frd", "ford"),
        ("frst", "forest"),
        ("frg", "forge"),
        ("frgs", "forges"),
        ("frk", "fork"),
        ("frks", "forks"),
        ("ft", "fort"),
        ("fwy", "freeway"),
        ("gdn", "garden"),
        ("gdns", "gardens"),
        ("gtwy", "gateway"),
        ("gln", "glen"),
        ("glns", "glens"),
        ("grn", "green"),
        ("grns", "greens"),
        ("grv", "grove"),
        ("grvs", "groves"),
        ("hbr", "harbor"),
        ("hbrs", "harbors"),
        ("hvn", "haven"),
        ("hts", "heights"),
        ("hwy", "highway"),
        ("hl", "hill"),
        ("hls", "hills"),
        ("holw", "hollow"),
        ("inlt", "inlet"),
        ("is", "island"),
        ("iss", "islands"),
        ("isle", "isle"),
        ("jct", "junction"),
        ("jcts", "junctions"),
        ("ky", "key"),
        ("kys", "keys"),
        ("knl", "knoll"),
        ("knls", "knolls"),
        ("lk", "lake"),
        ("lks", "lakes"),
        ("land", "land"),
        ("lndg", "landing"),
        ("ln", "lane"),
        ("lgt", "light"),
        ("lgts", "lights"),
        ("lf", "loaf"),
        ("lck", "lock"),
        ("lcks", "locks"),
        ("ldg", "lodge"),
        ("loop", "loop"),
        ("mall", "mall"),
        ("mnr", "manor"),
        ("mnrs", "manors"),
        ("mdw", "meadow"),
        ("mdws", "meadows"),
        ("ml", "mill"),
        ("mls", "mills"),
        ("msn", "mission"),
        ("mtwy", "motorway"),
        ("mt", "mount"),
        ("mtn", "mountain"),
        ("mtns", "mountains"),
        ("nck", "neck"),
        ("orch", "orchard"),
        ("oval", "oval"),
        ("opas", "overpass"),
        ("park", "park"),
        ("pkwy", "parkway"),
        ("pass", "pass"),
        ("psge", "passage"),
        ("path", "path"),
        ("pike", "pike"),
        ("pne", "pine"),
        ("pnes", "pines"),
        ("pl", "place"),
        ("pln", "plain"),
        ("plns", "plains"),
        ("plz", "plaza"),
        ("pt", "point"),
        ("pts", "points"),
        ("prt", "port"),
        ("prts", "ports"),
        ("pr", "prairie"),
        ("radl", "radial"),
        ("ramp", "ramp"),
        ("rnch", "ranch"),
        ("rpd", "rapid"),
        ("rpds", "rapids"),
        ("rst", "rest"),
        ("rdg", "ridge"),
        ("rdgs", "ridges"),
        ("riv", "river"),
        ("rd", "road"),
        ("rds", "roads"),
        ("rte", "route"),
        ("row", "row"),
        ("rue", "rue"),
        ("run", "run"),
        ("shl", "shoal"),
        ("shls", "shoals"),
        ("shr", "shore"),
        ("shrs", "shores"),
        ("skwy", "skyway"),
        ("spg", "spring"),
        ("spgs", "springs"),
        ("spur", "spur"),
        ("sq", "square"),
        ("sqs", "squares"),
        ("sta", "station"),
        ("stra", "stravenue"),
        ("strm", "stream"),
        ("st", "street"),
        ("sts", "streets"),
        ("smt", "summit"),
        ("ter", "terrace"),
        ("trwy", "throughway"),
        ("trce", "trace"),
        ("trak", "track"),
        ("trfy", "trafficway"),
        ("trl", "trail"),
        ("trlr", "trailer"),
        ("tunl", "tunnel"),
        ("tpke", "turnpike"),
        ("upas", "underpass"),
        ("un", "union"),
        ("uns", "unions"),
        ("vly", "valley"),
        ("vlys", "valleys"),
        ("via", "viaduct"),
        ("vw", "view"),
        ("vws", "views"),
        ("vlg", "village"),
        ("vl", "ville"),
        ("vis", "vista"),
        ("walk", "walk"),
        ("wall", "wall"),
        ("way", "way"),
        ("wls", "wells"),
    ]
    .into_iter()
    .collect()
});

/// Honorific and acronym expansions applied left-to-right during canonicalization step 8. A single
/// token on the left may expand to several tokens on the right, so the caller must re-scan from the
/// expansion point rather than simply advancing one token.
pub static HONORIFIC_EXPANSIONS: Lazy<Vec<(&'static str, &'static [&'static str])>> = Lazy::new(|| {
    vec![
        ("mlk", &["martin", "luther", "king"]),
        ("jfk", &["john", "f", "kennedy"]),
        ("us", &["us", "highway"]),
        ("sr", &["state", "route"]),
        ("fm", &["farm", "to", "market"]),
        ("co", &["county"]),
    ]
});

/// Stop words dropped during canonicalization step 9, provided at least one token survives.
pub static STOP_WORDS: &[&str] = &["the", "of", "and", "at", "to", "in", "on", "a", "an"];

/// The `singularize` function strips a trailing `s` from `word`, used to probe the suffix table for
/// a plural form (e.g. `"streets"` -> `"street"`) when an exact match fails.
pub fn singularize(word: &str) -> Option<&str> {
    word.strip_suffix('s').filter(|stem| !stem.is_empty())
}
