//! Tool availability check.

use console::style;

use marklens::ocr::{check_tools, OcrBackend, TesseractBackend};
use marklens::Config;

/// Report which external OCR tools are installed.
pub fn cmd_check(config: &Config) -> anyhow::Result<()> {
    println!("{}", style("Checking OCR tools...").bold());

    let mut pdf_missing = false;
    for (tool, found) in check_tools() {
        if found {
            println!("  {} {}", style("✓").green(), tool);
        } else {
            pdf_missing |= tool == "pdftoppm";
            println!("  {} {} (not found)", style("✗").red(), tool);
        }
    }

    let backend = TesseractBackend::with_settings(config.ocr.clone());
    let marker = if backend.is_available() {
        style("✓").green()
    } else {
        style("!").yellow()
    };
    println!(
        "\n{} {} ({}, language {})",
        marker,
        backend.availability_hint(),
        config.ocr.tesseract_bin,
        config.ocr.language
    );

    if pdf_missing {
        println!(
            "\n{} pdftoppm is only needed for PDF input (apt install poppler-utils)",
            style("→").dim()
        );
    }
    Ok(())
}
