use super::ReportData;
use std::error::Error;

pub fn render(report: &ReportData) -> Result<String, Box<dyn Error>> {
    let handlebars = crate::common::get_handlebars();
    let res = handlebars.render_template(&get_template(), report)?;
    Ok(res)
}

pub fn get_template() -> String {
    include_str!("to_markdown.hbs").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::{dataset, record, summary};

    fn report() -> ReportData {
        let records = vec![
            record(1, "Pump-A1", "Centrifugal Pump", 120.5),
            record(2, "Reactor|B2", "Batch Reactor", 85.0),
        ];
        let summaries = vec![summary(0, "Centrifugal Pump", 1), summary(1, "Batch Reactor", 1)];
        ReportData::build(&dataset(), &summaries, &records)
    }

    #[test]
    fn test_markdown_contains_sections() {
        let md = render(&report()).expect("render");
        assert!(md.starts_with("# Equipment Analysis Report: plant.csv\n"));
        assert!(md.contains("- Total equipment: 3"));
        assert!(md.contains("| Flowrate | 135.27 |"));
        assert!(md.contains("## Equipment type distribution"));
        assert!(md.contains("| Centrifugal Pump | 1 |"));
        assert!(md.contains("| 1 | Pump-A1 | Centrifugal Pump | 120.50 |"));
        assert!(md.contains("Reactor\\|B2"));
    }

    #[test]
    fn test_type_distribution_keeps_order() {
        let md = render(&report()).expect("render");
        let pump = md.find("| Centrifugal Pump | 1 |").expect("pump row");
        let reactor = md.find("| Batch Reactor | 1 |").expect("reactor row");
        assert!(pump < reactor);
    }

    #[test]
    fn test_empty_dataset_renders_placeholder() {
        let empty = crate::database::entities::datasets::Model {
            total_equipment_count: 0,
            avg_flowrate: None,
            avg_pressure: None,
            avg_temperature: None,
            ..dataset()
        };
        let md = render(&ReportData::build(&empty, &[], &[])).expect("render");
        assert!(md.contains("| Flowrate | n/a |"));
        assert!(md.contains("No equipment records."));
    }
}
