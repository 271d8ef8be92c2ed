//! The reader must produce the same workbook whatever order entries arrive in.

use proptest::prelude::*;
use std::sync::OnceLock;
use xlsxpack::{
    Anchor, CellRef, Drawing, Marker, MemoryEntrySource, MemorySink, Medium, Picture, Workbook,
    WriteOptions,
};

const CASES: u32 = 48;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn build_workbook() -> Workbook {
    let mut workbook = Workbook::new();
    workbook.properties.title = Some("Inventory".into());
    let crate_img = workbook.add_medium(Medium::from_buffer("image1", "png", vec![1, 2, 3]));
    workbook.add_medium(Medium::from_buffer("image2", "gif", vec![4, 5]));
    workbook.add_medium(Medium::from_buffer("image10", "png", vec![6]));

    for (n, name) in ["Stock", "Orders", "Archive"].into_iter().enumerate() {
        let sheet = workbook.add_worksheet(name);
        for row in 1..=20 {
            sheet.set_value(CellRef::new(row, 1), format!("item-{}", row % 7));
            sheet.set_value(CellRef::new(row, 2), f64::from(row) * (n as f64 + 1.5));
        }
    }
    workbook.worksheets[1].drawing = Some(Drawing {
        anchors: vec![Anchor {
            from: Marker::at(3, 1),
            to: Marker::at(6, 9),
            edit_as: None,
            picture: Picture {
                name: "Crate".into(),
                description: None,
                medium: crate_img,
            },
        }],
    });
    workbook
}

/// Entries of the sample package, in emission order.
fn package_entries() -> &'static Vec<(String, Vec<u8>)> {
    static ENTRIES: OnceLock<Vec<(String, Vec<u8>)>> = OnceLock::new();
    ENTRIES.get_or_init(|| {
        runtime().block_on(async {
            let mut workbook = build_workbook();
            let mut sink = MemorySink::new();
            workbook
                .write_to_sink(&mut sink, WriteOptions::default())
                .await
                .unwrap();
            sink.entries
        })
    })
}

fn read_entries(entries: Vec<(String, Vec<u8>)>) -> Workbook {
    runtime().block_on(async {
        let mut source = MemoryEntrySource::new(entries);
        Workbook::read_source(&mut source).await.unwrap()
    })
}

fn expected() -> &'static Workbook {
    static EXPECTED: OnceLock<Workbook> = OnceLock::new();
    EXPECTED.get_or_init(|| read_entries(package_entries().clone()))
}

#[test]
fn test_emission_order_reads_back() {
    let workbook = expected();
    assert_eq!(workbook.worksheets.len(), 3);
    assert_eq!(workbook.media.len(), 3);
    let names: Vec<String> = workbook.media.iter().map(|m| m.filename()).collect();
    assert_eq!(names, ["image1.png", "image2.gif", "image10.png"]);
    assert!(workbook.worksheets[1].drawing.is_some());
}

#[test]
fn test_reversed_order() {
    let mut entries = package_entries().clone();
    entries.reverse();
    assert_eq!(&read_entries(entries), expected());
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: CASES,
        .. ProptestConfig::default()
    })]

    #[test]
    fn any_arrival_order_gives_the_same_workbook(
        entries in Just(package_entries().clone()).prop_shuffle()
    ) {
        let read = read_entries(entries);
        prop_assert_eq!(&read, expected());
    }
}
