use std::collections::HashMap;
use std::sync::LazyLock;

use crate::location::Coordinates;

/// Approximate centroids for San Diego County ZIP codes.
const ZIP_CENTROIDS: &[(&str, f64, f64)] = &[
    // Central San Diego
    ("92101", 32.7195, -117.1628), // Downtown
    ("92102", 32.7097, -117.1182), // Southeast SD
    ("92103", 32.7469, -117.1698), // Hillcrest
    ("92104", 32.7418, -117.1296), // North Park
    ("92105", 32.7349, -117.0929), // City Heights
    ("92106", 32.7236, -117.2359), // Point Loma
    ("92107", 32.7462, -117.2494), // Ocean Beach
    ("92108", 32.7738, -117.1459), // Mission Valley
    ("92109", 32.7872, -117.2386), // Pacific Beach
    ("92110", 32.7659, -117.1995), // Morena
    ("92111", 32.8088, -117.1669), // Linda Vista
    ("92113", 32.6867, -117.1080), // Logan Heights
    ("92114", 32.7048, -117.0538), // Encanto
    ("92115", 32.7611, -117.0702), // College Area
    ("92116", 32.7619, -117.1273), // Normal Heights
    ("92117", 32.8244, -117.2003), // Clairemont
    ("92118", 32.6804, -117.1702), // Coronado
    ("92119", 32.7937, -117.0327), // San Carlos
    ("92120", 32.7955, -117.0701), // Allied Gardens
    ("92121", 32.8989, -117.2035), // Sorrento Valley
    ("92122", 32.8575, -117.2104), // University City
    ("92123", 32.8099, -117.1395), // Serra Mesa
    ("92124", 32.8284, -117.0839), // Tierrasanta
    ("92126", 32.9111, -117.1421), // Mira Mesa
    ("92127", 33.0239, -117.0842), // Rancho Bernardo
    ("92128", 33.0170, -117.0610), // Rancho Bernardo
    ("92129", 32.9632, -117.1239), // Rancho Penasquitos
    ("92130", 32.9557, -117.2264), // Carmel Valley
    ("92131", 32.9189, -117.0785), // Scripps Ranch
    ("92132", 32.7000, -117.2000), // Naval Base
    ("92134", 32.7200, -117.1500), // Naval Medical Center
    ("92135", 32.7000, -117.2000), // Naval Base
    ("92136", 32.6850, -117.1250), // Naval Station
    ("92139", 32.6802, -117.0499), // Paradise Hills
    ("92140", 32.7400, -117.1950), // Naval Training Center
    ("92145", 32.8800, -117.1400), // Miramar
    ("92154", 32.5752, -117.0582), // Otay Mesa

    // North County Coastal
    ("92007", 33.0475, -117.2917), // Cardiff
    ("92008", 33.1261, -117.3011), // Carlsbad
    ("92009", 33.0892, -117.2653), // Carlsbad
    ("92010", 33.1581, -117.3267), // Carlsbad
    ("92011", 33.1117, -117.3117), // Carlsbad
    ("92014", 32.9592, -117.2654), // Del Mar
    ("92024", 33.0372, -117.2789), // Encinitas
    ("92054", 33.1959, -117.3795), // Oceanside
    ("92056", 33.2126, -117.3296), // Oceanside
    ("92057", 33.2384, -117.3067), // Oceanside
    ("92058", 33.2200, -117.3500), // Oceanside
    ("92075", 32.9873, -117.2680), // Solana Beach
    ("92083", 33.1386, -117.1660), // Vista
    ("92084", 33.1856, -117.2386), // Vista

    // North County Inland
    ("92025", 33.0492, -117.0378), // Escondido
    ("92026", 33.1167, -117.0853), // Escondido
    ("92027", 33.1127, -117.0164), // Escondido
    ("92028", 33.3531, -117.2514), // Fallbrook
    ("92029", 33.0955, -117.0989), // Escondido
    ("92064", 32.9812, -117.0351), // Poway
    ("92065", 33.0364, -116.9575), // Ramona
    ("92066", 33.1850, -116.8756), // Ranchita
    ("92069", 33.1417, -117.1642), // San Marcos
    ("92078", 33.1248, -117.1714), // San Marcos
    ("92081", 33.1528, -117.2264), // Vista
    ("92082", 33.2067, -117.0083), // Valley Center
    ("92086", 33.2889, -116.5636), // Warner Springs

    // East County
    ("91901", 32.8353, -116.7664), // Alpine
    ("91902", 32.6358, -117.0431), // Bonita
    ("91905", 32.6600, -116.3167), // Boulevard
    ("91906", 32.6336, -116.4672), // Campo
    ("91910", 32.6400, -117.0100), // Chula Vista
    ("91911", 32.6100, -117.0400), // Chula Vista
    ("91913", 32.6308, -116.9558), // Chula Vista
    ("91914", 32.6594, -116.9236), // Chula Vista
    ("91915", 32.5992, -116.9489), // Chula Vista
    ("91916", 32.8300, -116.5500), // Descanso
    ("91917", 32.6194, -116.7667), // Dulzura
    ("91931", 32.8389, -116.5111), // Guatay
    ("91932", 32.5778, -117.1172), // Imperial Beach
    ("91935", 32.7092, -116.7875), // Jamul
    ("91941", 32.7675, -117.0028), // La Mesa
    ("91942", 32.7797, -117.0239), // La Mesa
    ("91945", 32.7406, -117.0453), // Lemon Grove
    ("91950", 32.6672, -117.0897), // National City
    ("91962", 32.7500, -116.4667), // Pine Valley
    ("91963", 32.6167, -116.6167), // Potrero
    ("91977", 32.7028, -117.0003), // Spring Valley
    ("91978", 32.7467, -116.9450), // Spring Valley
    ("92019", 32.7822, -116.9028), // El Cajon
    ("92020", 32.7917, -116.9614), // El Cajon
    ("92021", 32.8206, -116.9206), // El Cajon
    ("92040", 32.8333, -116.8667), // Lakeside
    ("92071", 32.8378, -116.9942), // Santee

    // Backcountry
    ("91934", 32.6000, -116.1667), // Jacumba
    ("92004", 33.2500, -116.3333), // Borrego Springs
    ("92036", 32.9833, -116.5833), // Julian
    ("92070", 33.1000, -116.6333), // Santa Ysabel
];

static ZIP_INDEX: LazyLock<HashMap<&'static str, Coordinates>> = LazyLock::new(|| {
    ZIP_CENTROIDS
        .iter()
        .map(|(zip, lat, lng)| (*zip, Coordinates::new(*lat, *lng)))
        .collect()
});

/// Look up the centroid of a ZIP code. Input is trimmed and cut to five
/// characters, so ZIP+4 works.
pub fn coordinates_for_zip(zip: &str) -> Option<Coordinates> {
    let cleaned: String = zip.trim().chars().take(5).collect();
    ZIP_INDEX.get(cleaned.as_str()).copied()
}

/// Exactly five ASCII digits after trimming.
pub fn is_valid_zip_format(zip: &str) -> bool {
    let zip = zip.trim();
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}
