//! Shared fixture: a miniature Geonames dataset written into a temp
//! directory, exercising the full cold-build path (zip archive, country
//! info, admin divisions) without touching the network.

use std::fs::File;
use std::io::Write;

use tempfile::TempDir;

use geodex_core::{Config, Geodex};

/// (name, alternates, lat, lng, country, admin1, population)
type CityRow = (&'static str, &'static str, f64, f64, &'static str, &'static str, i64);

const CITY_ROWS: &[CityRow] = &[
    ("Austin", "", 30.26715, -97.74306, "US", "TX", 931_830),
    ("Austin", "", 43.66663, -92.97464, "US", "MN", 24_718),
    ("Paris", "Lutetia,Paname", 48.85341, 2.3488, "FR", "11", 2_138_551),
    ("Paris", "", 33.66094, -95.55551, "US", "TX", 24_782),
    ("New York City", "New York,NYC,Big Apple", 40.71427, -74.00597, "US", "NY", 8_175_133),
    ("Tokyo", "Tokio,Tokyo,東京", 35.6895, 139.69171, "JP", "40", 8_336_599),
    ("London", "Londres,Londra", 51.50853, -0.12574, "GB", "ENG", 8_961_989),
    ("City of London", "Square Mile", 51.51279, -0.09184, "GB", "ENG", 7_556),
    ("Sydney", "", -33.86785, 151.20732, "AU", "02", 4_627_345),
    ("Mumbai", "Bombay,Mumbai", 19.07283, 72.88261, "IN", "16", 12_691_836),
    ("Cairo", "Al Qahirah,Caire", 30.06263, 31.24967, "EG", "11", 7_734_614),
    ("Cairo", "", 37.00533, -89.17646, "US", "IL", 2_831),
    ("Palo Alto", "", 37.44188, -122.14302, "US", "CA", 64_403),
    ("Santa Cruz", "", 36.97412, -122.0308, "US", "CA", 64_725),
    ("San Francisco", "SF", 37.77493, -122.41942, "US", "CA", 864_816),
    ("Berlin", "", 52.52437, 13.41053, "DE", "16", 3_426_354),
    ("Springfield", "", 37.21533, -93.29824, "US", "MO", 166_810),
    ("Springfield", "", 39.80172, -89.64371, "US", "IL", 116_250),
    ("Springfield", "", 42.10148, -72.58981, "US", "MA", 154_341),
    ("Portland", "", 45.52345, -122.67621, "US", "OR", 632_309),
    ("Portland", "", 43.66147, -70.25533, "US", "ME", 66_881),
    ("Georgetown", "", 38.2098, -85.65801, "US", "KY", 0),
    ("Georgetown", "", 30.63269, -97.67723, "US", "TX", 0),
    ("Seoul", "Seul", 37.566, 126.9784, "KR", "11", 10_349_312),
    ("Moscow", "Moskva", 55.75222, 37.61556, "RU", "48", 10_381_222),
    ("Nairobi", "", -1.28333, 36.81667, "KE", "05", 2_750_547),
    ("Lagos", "", 6.45407, 3.39467, "NG", "05", 8_789_133),
    ("Beijing", "Peking", 39.9075, 116.39723, "CN", "22", 11_716_620),
];

/// (iso, iso3, numeric, name, capital)
const COUNTRY_ROWS: &[(&str, &str, &str, &str, &str)] = &[
    ("US", "USA", "840", "United States", "Washington"),
    ("FR", "FRA", "250", "France", "Paris"),
    ("GB", "GBR", "826", "United Kingdom", "London"),
    ("JP", "JPN", "392", "Japan", "Tokyo"),
    ("AU", "AUS", "036", "Australia", "Canberra"),
    ("IN", "IND", "356", "India", "New Delhi"),
    ("EG", "EGY", "818", "Egypt", "Cairo"),
    ("DE", "DEU", "276", "Germany", "Berlin"),
    ("KR", "KOR", "410", "South Korea", "Seoul"),
    ("RU", "RUS", "643", "Russia", "Moscow"),
    ("KE", "KEN", "404", "Kenya", "Nairobi"),
    ("NG", "NGA", "566", "Nigeria", "Abuja"),
    ("CN", "CHN", "156", "China", "Beijing"),
];

const ADMIN_ROWS: &[(&str, &str)] = &[
    ("US.TX", "Texas"),
    ("US.MN", "Minnesota"),
    ("US.NY", "New York"),
    ("US.IL", "Illinois"),
    ("US.MO", "Missouri"),
    ("US.MA", "Massachusetts"),
    ("US.CA", "California"),
    ("US.OR", "Oregon"),
    ("US.ME", "Maine"),
    ("US.KY", "Kentucky"),
    ("FR.11", "Île-de-France"),
    ("GB.ENG", "England"),
    ("JP.40", "Tokyo"),
    ("AU.02", "New South Wales"),
    ("IN.16", "Maharashtra"),
    ("EG.11", "Cairo Governorate"),
    ("DE.16", "Berlin"),
    ("KR.11", "Seoul"),
    ("RU.48", "Moscow"),
    ("KE.05", "Nairobi Area"),
    ("NG.05", "Lagos"),
    ("CN.22", "Beijing"),
];

fn cities_tsv() -> String {
    let mut out = String::new();
    for (i, (name, alt, lat, lng, cc, admin1, pop)) in CITY_ROWS.iter().enumerate() {
        out.push_str(&format!(
            "{id}\t{name}\t{name}\t{alt}\t{lat}\t{lng}\tP\tPPL\t{cc}\t\t{admin1}\t\t\t\t{pop}\t\t10\tUTC\t2024-01-01\n",
            id = i + 1,
        ));
    }
    out
}

fn country_tsv() -> String {
    let mut out = String::from("# ISO\tISO3\tISO-Numeric\tfips\tCountry\n");
    for (iso, iso3, numeric, name, capital) in COUNTRY_ROWS {
        out.push_str(&format!(
            "{iso}\t{iso3}\t{numeric}\t{iso}\t{name}\t{capital}\t1000\t1000000\tNA\t.{tld}\tUSD\tDollar\t1\t\t\ten\t{gid}\t\t\n",
            tld = iso.to_lowercase(),
            gid = 1_000_000 + numeric.parse::<i64>().unwrap(),
        ));
    }
    out
}

fn admin_tsv() -> String {
    let mut out = String::new();
    for (i, (key, name)) in ADMIN_ROWS.iter().enumerate() {
        out.push_str(&format!("{key}\t{name}\t{name}\t{}\n", 2_000_000 + i));
    }
    out
}

/// Writes the synthetic dataset and returns a config pointing at it.
pub fn fixture_config(dir: &TempDir) -> Config {
    let data_dir = dir.path().join("data");
    let cache_dir = dir.path().join("cache");
    std::fs::create_dir_all(&data_dir).unwrap();

    let zip_path = data_dir.join("cities1000.zip");
    let mut writer = zip::ZipWriter::new(File::create(&zip_path).unwrap());
    writer
        .start_file("cities1000.txt", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(cities_tsv().as_bytes()).unwrap();
    writer.finish().unwrap();

    std::fs::write(data_dir.join("countryInfo.txt"), country_tsv()).unwrap();
    std::fs::write(data_dir.join("admin1CodesASCII.txt"), admin_tsv()).unwrap();

    Config::default()
        .with_data_dir(data_dir)
        .with_cache_dir(cache_dir)
}

/// Cold-builds an instance over the synthetic dataset.
pub fn fixture_geodex() -> (Geodex, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(&dir);
    let geodex = Geodex::with_config(config).unwrap();
    (geodex, dir)
}
