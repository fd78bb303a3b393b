use std::io::Write;
use std::path::Path;

use log::info;

use super::error::Result;
use super::filter::View;

/// Write the view as CSV: the dataset's header row, then every record of the
/// view in order, fields exactly as they were read.
pub fn write_csv<W: Write>(view: &View, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(view.dataset().headers())?;
    for rec in view.records() {
        writer.write_record(rec.raw())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the view to `path`, replacing any existing file.
pub fn export_csv(view: &View, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(view, std::io::BufWriter::new(file))?;
    info!("Exported {} records to {}", view.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::values_of;
    use crate::data::filter::{apply, Choice, FilterSelection};
    use crate::data::loader::{load_file, read_csv};
    use crate::data::model::{LOCATION, TEMPERATURE, WEATHER_TYPE};

    fn to_csv_string(view: &View) -> String {
        let mut buf = Vec::new();
        write_csv(view, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    const INPUT: &str = "Temperature,Humidity,Wind Speed,UV Index,Weather Type,Location\n\
                         30.0,40,5.5,8,Sunny,coastal\n\
                         18,90,12,1,Rainy,inland\n\
                         32,,4,9,Sunny,inland\n\
                         22,70,8,3,Cloudy,\"mountain, north\"\n";

    #[test]
    fn full_view_reproduces_input_bytes() {
        let ds = read_csv(INPUT.as_bytes()).unwrap();
        let out = to_csv_string(&View::all(&ds));
        assert_eq!(out, INPUT);
    }

    #[test]
    fn filtered_view_keeps_header_and_order() {
        let ds = read_csv(INPUT.as_bytes()).unwrap();
        let sel = FilterSelection::new().with(WEATHER_TYPE, Choice::Value("Sunny".into()));
        let out = to_csv_string(&apply(&ds, &sel).view);
        assert_eq!(
            out,
            "Temperature,Humidity,Wind Speed,UV Index,Weather Type,Location\n\
             30.0,40,5.5,8,Sunny,coastal\n\
             32,,4,9,Sunny,inland\n"
        );
    }

    #[test]
    fn empty_view_exports_header_only() {
        let ds = read_csv(INPUT.as_bytes()).unwrap();
        let out = to_csv_string(&View::from_indices(&ds, Vec::new()));
        assert_eq!(out, "Temperature,Humidity,Wind Speed,UV Index,Weather Type,Location\n");
    }

    #[test]
    fn export_then_reload_round_trips() {
        let ds = read_csv(INPUT.as_bytes()).unwrap();
        let sel = FilterSelection::new().with(LOCATION, Choice::Value("inland".into()));
        let view = apply(&ds, &sel).view;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered.csv");
        export_csv(&view, &path).unwrap();

        let reloaded = load_file(&path).unwrap();
        assert_eq!(reloaded.len(), view.len());
        assert_eq!(
            reloaded.headers().iter().collect::<Vec<_>>(),
            ds.headers().iter().collect::<Vec<_>>()
        );
        for (a, b) in reloaded.records().iter().zip(view.records()) {
            assert_eq!(a.raw().iter().collect::<Vec<_>>(), b.raw().iter().collect::<Vec<_>>());
        }
        assert_eq!(
            values_of(&View::all(&reloaded), TEMPERATURE).unwrap(),
            values_of(&view, TEMPERATURE).unwrap()
        );
    }
}
