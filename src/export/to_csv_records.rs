use crate::database::entities::equipment_records;
use csv::Writer;
use std::error::Error;

/// Records as CSV with the canonical header, in the order given
pub fn render(records: &[equipment_records::Model]) -> Result<String, Box<dyn Error>> {
    let mut wtr = Writer::from_writer(vec![]);

    wtr.write_record([
        "Equipment Name",
        "Type",
        "Flowrate",
        "Pressure",
        "Temperature",
    ])?;

    for record in records {
        wtr.write_record(&[
            record.equipment_name.clone(),
            record.equipment_type.clone(),
            record.flowrate.to_string(),
            record.pressure.to_string(),
            record.temperature.to_string(),
        ])?;
    }

    let data = wtr.into_inner()?;
    let csv_string = String::from_utf8(data)?;

    Ok(csv_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::record;
    use crate::ingest::validate;

    #[test]
    fn test_render_header_and_rows() {
        let csv = render(&[record(1, "Pump-A1", "Centrifugal Pump", 120.5)]).expect("render");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Equipment Name,Type,Flowrate,Pressure,Temperature")
        );
        assert_eq!(lines.next(), Some("Pump-A1,Centrifugal Pump,120.5,1.5,20"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_is_accepted_by_validator() {
        let records = vec![
            record(1, "Heat Exchanger, North", "Shell \"and\" Tube", 200.3),
            record(2, "P-2", "Pump", 0.25),
        ];
        let csv = render(&records).expect("render");
        let parsed = validate(csv.as_bytes()).expect("valid csv");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Heat Exchanger, North");
        assert_eq!(parsed[0].equipment_type, "Shell \"and\" Tube");
        assert_eq!(parsed[1].flowrate, 0.25);
    }
}
