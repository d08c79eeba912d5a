//! Collector integration tests
//!
//! Build an unpacked package on disk and run every scan over it with the
//! text XML extractor and an in-memory resource table.

use refscan::resources::{get_service_loader_classes, CollectorOptions};
use refscan::{
    MemoryResourceTable, PackageLayout, ResourceCollector, TextXmlExtractor, UnpackedPackage,
};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// An APK-shaped directory with layouts, a keep list, native libraries and
/// service loader files
fn sample_package() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "res/layout/activity_main.xml",
        br#"<?xml version="1.0" encoding="utf-8"?>
<LinearLayout xmlns:android="http://schemas.android.com/apk/res/android">
    <com.example.widget.Chart android:onClick="onChartClick" />
    <fragment android:name="@0x7f130001" />
    <Button android:onClick="@0x7f130002" />
</LinearLayout>"#,
    );
    write(
        root,
        "res/layout-land/activity_main.xml",
        br#"<LinearLayout><com.example.widget.Chart /><view class="com.example.widget.Legend"/></LinearLayout>"#,
    );
    write(
        root,
        "res/anim/fade.xml",
        br#"<set><com.example.anim.Interpolator /></set>"#,
    );
    write(root, "res/layout/broken.xml", b"<LinearLayout><Button></LinearLayout>");
    write(
        root,
        "res/layout/truncated.xml",
        b"<LinearLayout><com.example.widget.Truncated android:onClick=\"onTruncated\" />",
    );
    write(
        root,
        "res/raw/keep.xml",
        br#"<resources xmlns:tools="http://schemas.android.com/tools" tools:keep="@layout/activity_main, @drawable/logo"/>"#,
    );
    write(
        root,
        "lib/arm64-v8a/libnative.so",
        b"\x7fELF\x00\x00Lcom/example/jni/Bridge;\x00com/example/jni/Callback\x00short\x00",
    );
    write(
        root,
        "META-INF/services/com.example.spi.Plugin",
        b"com.example.spi.PluginImpl\n",
    );

    dir
}

fn sample_table() -> MemoryResourceTable {
    MemoryResourceTable::new()
        .with_string(0x7f120001, "com.example.ui.DetailFragment")
        .with_string(0x7f120001, "com.example.ui.TabletDetailFragment")
        .with_reference(0x7f130001, 0x7f120001)
        .with_string(0x7f120002, "onButtonClick")
        .with_reference(0x7f130002, 0x7f120002)
}

fn strings(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_layout_classes_and_attributes() {
    let dir = sample_package();
    let package = UnpackedPackage::new(dir.path());
    let extractor = TextXmlExtractor::new();
    let collector = ResourceCollector::new(&package, &extractor);

    let scan = collector
        .collect_layout_classes_and_attributes(&strings(&["android:onClick"]), &sample_table());

    assert_eq!(
        scan.classes,
        strings(&[
            "Lcom/example/widget/Chart;",
            "Lcom/example/widget/Legend;",
            "Lcom/example/ui/DetailFragment;",
            "Lcom/example/ui/TabletDetailFragment;",
        ])
    );

    let mut on_click = scan.attributes["android:onClick"].clone();
    on_click.sort();
    assert_eq!(on_click, vec!["onButtonClick", "onChartClick"]);
}

#[test]
fn test_skip_prefixes_are_configurable() {
    let dir = sample_package();
    let package = UnpackedPackage::new(dir.path());
    let extractor = TextXmlExtractor::new();
    let options = CollectorOptions {
        skip_dir_prefixes: vec![],
        ..CollectorOptions::default()
    };
    let collector = ResourceCollector::new(&package, &extractor).with_options(options);

    let scan = collector.collect_layout_classes_and_attributes(&HashSet::new(), &sample_table());

    assert!(scan.classes.contains("Lcom/example/anim/Interpolator;"));
}

#[test]
fn test_unresolved_references_without_table() {
    let dir = sample_package();
    let package = UnpackedPackage::new(dir.path());
    let extractor = TextXmlExtractor::new();
    let collector = ResourceCollector::new(&package, &extractor);

    let scan = collector.collect_layout_classes_and_attributes(
        &strings(&["android:onClick"]),
        &MemoryResourceTable::new(),
    );

    assert!(!scan.classes.contains("Lcom/example/ui/DetailFragment;"));
    assert_eq!(scan.attributes["android:onClick"], vec!["onChartClick"]);
}

#[test]
fn test_attribute_string_values() {
    let dir = sample_package();
    let package = UnpackedPackage::new(dir.path());
    let extractor = TextXmlExtractor::new();

    let values = ResourceCollector::new(&package, &extractor).collect_xml_attribute_string_values();

    assert!(values.contains("onChartClick"));
    assert!(values.contains("com.example.widget.Legend"));
    assert!(values.contains("@layout/activity_main, @drawable/logo"));
    assert!(!values.contains("@0x7f130002"));
    assert!(!values.contains("onTruncated"));
}

#[test]
fn test_native_classes() {
    let dir = sample_package();
    let package = UnpackedPackage::new(dir.path());
    let extractor = TextXmlExtractor::new();

    let classes = ResourceCollector::new(&package, &extractor).get_native_classes();

    assert_eq!(
        classes,
        strings(&["Lcom/example/jni/Bridge;", "Lcom/example/jni/Callback;"])
    );
    assert!(classes
        .iter()
        .all(|c| c.starts_with('L') && c.ends_with(';') && c.len() >= 12));
}

#[test]
fn test_keep_resources() {
    let dir = sample_package();
    let package = UnpackedPackage::new(dir.path());
    let extractor = TextXmlExtractor::new();

    let kept = ResourceCollector::new(&package, &extractor).get_all_keep_resources();

    assert_eq!(kept, strings(&["activity_main", "logo"]));
}

#[test]
fn test_service_loader_classes() {
    let dir = sample_package();

    let classes = get_service_loader_classes(&dir.path().join("META-INF/services"));

    assert_eq!(
        classes,
        strings(&["Lcom/example/spi/Plugin;", "Lcom/example/spi/PluginImpl;"])
    );
}

#[test]
fn test_bundle_layout_with_many_files() {
    let dir = TempDir::new().unwrap();
    for module in ["base", "feature_a", "feature_b"] {
        for i in 0..40 {
            write(
                dir.path(),
                &format!("{module}/res/layout/screen_{i}.xml"),
                format!("<FrameLayout><com.example.{module}.View{i} /></FrameLayout>").as_bytes(),
            );
        }
    }

    let package = UnpackedPackage::new(dir.path());
    assert_eq!(package.resource_directories().len(), 3);

    let extractor = TextXmlExtractor::new();
    let options = CollectorOptions {
        xml_threads: 3,
        ..CollectorOptions::default()
    };
    let scan = ResourceCollector::new(&package, &extractor)
        .with_options(options)
        .collect_layout_classes_and_attributes(&HashSet::new(), &MemoryResourceTable::new());

    assert_eq!(scan.classes.len(), 120);
    assert!(scan.classes.contains("Lcom/example/feature_b/View39;"));
}
