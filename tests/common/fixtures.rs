use banded::{
    Alignment, Band, Calculation, CalculationKind, Drawable, FontSpec, FontStyle, Parameter,
    Report, ResetScope, VarType, Variable,
};
use serde_json::{Value, json};

/// Rows of an invoice listing: `Item i` with price `i` and quantity
/// `i % 3 + 1`.
pub fn invoice_rows(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "item": format!("Item {}", i),
                "price": i,
                "qty": i % 3 + 1,
            })
        })
        .collect()
}

/// An A4 invoice listing.
///
/// Title 15mm, header 10mm, body 5mm, footer 10mm, summary 20mm. The
/// footer shows the page total, the summary the grand total, the average
/// price and the largest quantity.
pub fn invoice_report() -> Report {
    let mut report = Report::default();
    let title_font = report
        .register_font(
            FontSpec::new("Helvetica, Arial", 16.0)
                .with_id("title")
                .with_style(FontStyle::BOLD),
        )
        .unwrap();
    report.add_parameter(Parameter::new("company", VarType::String, "ACME Ltd"));

    report.add_variable(Variable::new("page_amount", VarType::Decimal, 0));
    report.add_variable(Variable::new("total_amount", VarType::Decimal, 0));
    report.add_variable(Variable::new("avg_price", VarType::Float, 0));
    report.add_variable(Variable::new("max_qty", VarType::Integer, 0));
    report.add_calculation(
        Calculation::new(CalculationKind::Sum, "page_amount", "row.qty * row.price")
            .with_reset(ResetScope::Page),
    );
    report.add_calculation(Calculation::new(
        CalculationKind::Sum,
        "total_amount",
        "row.qty * row.price",
    ));
    report.add_calculation(Calculation::new(CalculationKind::Avg, "avg_price", "row.price"));
    report.add_calculation(Calculation::new(CalculationKind::Max, "max_qty", "row.qty"));

    for (band, height) in [
        (Band::Title, 15.0),
        (Band::Header, 10.0),
        (Band::Body, 5.0),
        (Band::Footer, 10.0),
        (Band::Summary, 20.0),
    ] {
        report.set_band_height(band, height).unwrap();
    }

    report
        .add_to_band(
            Band::Title,
            (0.0, 0.0),
            Drawable::text((120.0, 10.0), "parameters.company").with_font(title_font),
        )
        .unwrap();
    report
        .add_to_band(Band::Title, (0.0, 14.0), Drawable::hline(-1.0).with_line_width(0.5))
        .unwrap();

    for (x, label) in [(0.0, "'Item'"), (100.0, "'Qty'"), (130.0, "'Price'")] {
        report
            .add_to_band(Band::Header, (x, 0.0), Drawable::text((30.0, 8.0), label))
            .unwrap();
    }
    report
        .add_to_band(
            Band::Header,
            (170.0, 0.0),
            Drawable::text((40.0, 8.0), "'Page %d' % system.page").with_alignment(Alignment::Right),
        )
        .unwrap();
    report
        .add_to_band(Band::Header, (0.0, 9.0), Drawable::hline(-1.0))
        .unwrap();

    report
        .add_to_band(Band::Body, (0.0, 0.0), Drawable::text((100.0, 5.0), "row.item"))
        .unwrap();
    report
        .add_to_band(Band::Body, (100.0, 0.0), Drawable::text((30.0, 5.0), "row.qty"))
        .unwrap();
    report
        .add_to_band(
            Band::Body,
            (130.0, 0.0),
            Drawable::text((30.0, 5.0), "'%.2f' % row.price").with_alignment(Alignment::Right),
        )
        .unwrap();

    report
        .add_to_band(
            Band::Footer,
            (0.0, 2.0),
            Drawable::text((100.0, 8.0), "'Page total: %.2f' % vars.page_amount"),
        )
        .unwrap();

    report
        .add_to_band(Band::Summary, (0.0, 0.0), Drawable::rect((-1.0, 20.0)))
        .unwrap();
    for (y, expression) in [
        (1.0, "'Total: %.2f' % vars.total_amount"),
        (7.0, "'Average price: %.2f' % vars.avg_price"),
        (13.0, "'Largest quantity: %d' % vars.max_qty"),
    ] {
        report
            .add_to_band(Band::Summary, (2.0, y), Drawable::text((150.0, 5.0), expression))
            .unwrap();
    }
    report
}
