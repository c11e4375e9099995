use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use paragon_ledger::ReceiptService;
use paragon_ocr::{OcrConfig, VisionClient};
use paragon_storage::JsonStore;

pub fn open_service(db: &Path) -> ReceiptService<JsonStore> {
    ReceiptService::new(JsonStore::new(db))
}

pub fn ingest(service: &ReceiptService<JsonStore>, input: &Path) -> anyhow::Result<()> {
    let raw = read_payload(input)?;
    let receipt = service.add_receipt(&raw)?;
    println!("Ingested receipt {} ({}, {} items)", receipt.id, receipt.store, receipt.items.len());
    Ok(())
}

pub async fn scan(
    service: &ReceiptService<JsonStore>,
    input: &Path,
    mime: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let mime = mime.map(str::to_string).or_else(|| guess_mime(input));

    let client = VisionClient::new(OcrConfig::from_env());
    let raw = client.analyze_receipt(&bytes, mime.as_deref()).await?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let receipt = service.add_receipt(&raw)?;
    println!("Ingested receipt {} ({}, {} items)", receipt.id, receipt.store, receipt.items.len());
    Ok(())
}

pub fn list(service: &ReceiptService<JsonStore>) -> anyhow::Result<()> {
    let receipts = service.receipts()?;
    if receipts.is_empty() {
        println!("No receipts stored.");
        return Ok(());
    }
    for receipt in receipts {
        println!(
            "{}  {}  {:>10} {}  {} items  {}",
            receipt.effective_date().format("%Y-%m-%d"),
            receipt.id,
            receipt.totals.total,
            receipt.currency,
            receipt.items.len(),
            receipt.store,
        );
    }
    Ok(())
}

pub fn show(service: &ReceiptService<JsonStore>, id: &str) -> anyhow::Result<()> {
    let receipt = service.receipt(id)?.with_context(|| format!("Receipt not found: {id}"))?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}

pub fn delete(service: &ReceiptService<JsonStore>, id: &str) -> anyhow::Result<()> {
    if service.delete_receipt(id)? {
        println!("Deleted receipt {id}");
        Ok(())
    } else {
        anyhow::bail!("Receipt not found: {id}")
    }
}

pub fn products(service: &ReceiptService<JsonStore>) -> anyhow::Result<()> {
    let products = service.products()?;
    if products.is_empty() {
        println!("No products tracked.");
        return Ok(());
    }
    for product in products {
        println!(
            "{}  {:>10} / {:<4}  {:<12} {}  ({}, {} price points)",
            product.id,
            product.last_price,
            product.unit,
            product.category,
            product.name,
            product.store,
            product.price_history.len(),
        );
    }
    Ok(())
}

pub fn stats(service: &ReceiptService<JsonStore>) -> anyhow::Result<()> {
    let stats = service.stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn read_payload(input: &Path) -> anyhow::Result<Value> {
    let text = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };
    serde_json::from_str(&text).context("Input is not valid JSON")
}

fn guess_mime(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime.to_string())
}
