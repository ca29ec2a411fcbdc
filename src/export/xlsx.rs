//! Minimal Office Open XML workbook patching.
//!
//! A template is opened as a zip archive, its active worksheet is located
//! through `xl/workbook.xml` and the workbook relationships, and the mapped
//! cells are rewritten in place. Every other archive entry is copied raw,
//! so the same template and the same values always produce the same bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{Cursor, Read, Seek, Write};

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    /// Written as a numeric cell; the string must already be a valid number.
    Number(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub coordinate: &'static str,
    pub value: CellValue,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("not a readable xlsx archive: {0}")]
    Archive(#[from] ZipError),
    #[error("malformed workbook xml: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed workbook xml attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("i/o error while reading workbook: {0}")]
    Io(#[from] std::io::Error),
    #[error("workbook part {0} is missing")]
    MissingPart(String),
    #[error("workbook part {0} ends unexpectedly")]
    Truncated(&'static str),
    #[error("workbook has no worksheet at tab {0}")]
    NoActiveSheet(usize),
    #[error("worksheet {0} has no sheetData element")]
    MissingSheetData(String),
    #[error("invalid cell coordinate {0}")]
    InvalidCoordinate(String),
    #[error("cell {coordinate} lies outside the template range {dimension}")]
    OutOfRange { coordinate: String, dimension: String },
    #[error("cell {0} holds a character that xml cannot represent")]
    IllegalCharacter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRef {
    row: u32,
    column: u32,
}

impl CellRef {
    fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw.trim().chars().filter(|ch| *ch != '$').collect();
        let split = cleaned.find(|ch: char| ch.is_ascii_digit())?;
        let (letters, digits) = cleaned.split_at(split);
        if letters.is_empty() || !letters.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return None;
        }
        let column = letters.chars().try_fold(0u32, |acc, ch| {
            let value = (ch.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
            acc.checked_mul(26)?.checked_add(value)
        })?;
        let row = digits.parse::<u32>().ok().filter(|row| *row > 0)?;
        Some(Self { row, column })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut column = self.column;
        while column > 0 {
            let rem = (column - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            column = (column - 1) / 26;
        }
        let letters: String = letters.into_iter().rev().collect();
        write!(f, "{letters}{}", self.row)
    }
}

/// The `<dimension ref="A1:G30"/>` range a template declares.
#[derive(Debug, Clone)]
struct Dimension {
    raw: String,
    first: CellRef,
    last: CellRef,
}

impl Dimension {
    fn parse(raw: &str) -> Result<Self, TemplateError> {
        let invalid = || TemplateError::InvalidCoordinate(raw.to_string());
        let (first, last) = match raw.split_once(':') {
            Some((first, last)) => (
                CellRef::parse(first).ok_or_else(invalid)?,
                CellRef::parse(last).ok_or_else(invalid)?,
            ),
            None => {
                let single = CellRef::parse(raw).ok_or_else(invalid)?;
                (single, single)
            }
        };
        Ok(Self {
            raw: raw.to_string(),
            first,
            last,
        })
    }

    fn contains(&self, cell: CellRef) -> bool {
        (self.first.row..=self.last.row).contains(&cell.row)
            && (self.first.column..=self.last.column).contains(&cell.column)
    }
}

struct SheetCell {
    column: u32,
    start: BytesStart<'static>,
    body: Vec<Event<'static>>,
}

struct SheetRow {
    number: u32,
    start: BytesStart<'static>,
    cells: Vec<SheetCell>,
    trailing: Vec<Event<'static>>,
    touched: bool,
}

impl SheetRow {
    fn new(number: u32, start: BytesStart<'static>) -> Self {
        Self {
            number,
            start,
            cells: Vec::new(),
            trailing: Vec::new(),
            touched: false,
        }
    }
}

/// Writes `cells` into the active worksheet of `template` and returns the new workbook.
pub fn fill_template(template: &[u8], cells: &[CellWrite]) -> Result<Vec<u8>, TemplateError> {
    for cell in cells {
        if let CellValue::Text(text) = &cell.value {
            if text.chars().any(is_illegal_xml_char) {
                return Err(TemplateError::IllegalCharacter(cell.coordinate.to_string()));
            }
        }
    }

    let mut archive = ZipArchive::new(Cursor::new(template))?;
    let sheet_path = active_sheet_path(&mut archive)?;
    let sheet_xml = read_part(&mut archive, &sheet_path)?;
    let patched = patch_worksheet(&sheet_path, &sheet_xml, cells)?;

    let mut output = Cursor::new(Vec::with_capacity(template.len() + patched.len()));
    {
        let mut writer = ZipWriter::new(&mut output);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        for index in 0..archive.len() {
            let entry = archive.by_index(index)?;
            if entry.name() == sheet_path {
                writer.start_file(sheet_path.as_str(), options)?;
                writer.write_all(&patched)?;
            } else {
                writer.raw_copy_file(entry)?;
            }
        }
        writer.finish()?;
    }

    Ok(output.into_inner())
}

/// Characters outside the XML 1.0 `Char` production.
fn is_illegal_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}

/// Checks that `coordinates` can be written into `template` without producing output.
pub fn verify_template(template: &[u8], coordinates: &[&'static str]) -> Result<(), TemplateError> {
    let probes: Vec<CellWrite> = coordinates
        .iter()
        .map(|coordinate| CellWrite {
            coordinate,
            value: CellValue::Text(String::new()),
        })
        .collect();
    fill_template(template, &probes).map(|_| ())
}

/// Reads every cell of the active worksheet as text, keyed by coordinate.
///
/// Shared strings are resolved, inline strings concatenated and numbers
/// returned as written.
pub fn read_cells(workbook: &[u8]) -> Result<BTreeMap<String, String>, TemplateError> {
    let mut archive = ZipArchive::new(Cursor::new(workbook))?;
    let shared = match read_part(&mut archive, SHARED_STRINGS_PART) {
        Ok(xml) => parse_shared_strings(&xml)?,
        Err(TemplateError::MissingPart(_)) => Vec::new(),
        Err(err) => return Err(err),
    };
    let sheet_path = active_sheet_path(&mut archive)?;
    let xml = read_part(&mut archive, &sheet_path)?;

    let mut reader = Reader::from_str(&xml);
    let mut cells = BTreeMap::new();
    let mut current: Option<(String, Option<String>)> = None;
    let mut capturing = false;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"c" => {
                let coordinate = attribute(&e, b"r")?.unwrap_or_default();
                current = Some((coordinate, attribute(&e, b"t")?));
                text.clear();
            }
            Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                if let Some(coordinate) = attribute(&e, b"r")? {
                    cells.insert(coordinate, String::new());
                }
            }
            Event::Start(e) if matches!(e.local_name().as_ref(), b"v" | b"t") => {
                capturing = current.is_some();
            }
            Event::End(e) if matches!(e.local_name().as_ref(), b"v" | b"t") => {
                capturing = false;
            }
            Event::Text(t) if capturing => text.push_str(&t.unescape()?),
            Event::End(e) if e.local_name().as_ref() == b"c" => {
                if let Some((coordinate, kind)) = current.take() {
                    let value = match kind.as_deref() {
                        Some("s") => text
                            .trim()
                            .parse::<usize>()
                            .ok()
                            .and_then(|index| shared.get(index).cloned())
                            .unwrap_or_default(),
                        _ => text.clone(),
                    };
                    cells.insert(coordinate, value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(cells)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, TemplateError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(TemplateError::MissingPart(name.to_string())),
        Err(err) => return Err(err.into()),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(xml)
}

fn attribute(element: &BytesStart, key: &[u8]) -> Result<Option<String>, TemplateError> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn active_sheet_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, TemplateError> {
    let workbook = read_part(archive, WORKBOOK_PART)?;
    let mut reader = Reader::from_str(&workbook);
    let mut active_tab = 0usize;
    let mut sheet_rel_ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"workbookView" => {
                    if let Some(tab) = attribute(&e, b"activeTab")? {
                        active_tab = tab.parse().unwrap_or(0);
                    }
                }
                b"sheet" => {
                    // `r:id`; the relationship prefix varies between producers.
                    let rel_id = e
                        .attributes()
                        .filter_map(Result::ok)
                        .find(|attr| {
                            attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some()
                        })
                        .map(|attr| attr.unescape_value().map(|v| v.into_owned()))
                        .transpose()?;
                    if let Some(rel_id) = rel_id {
                        sheet_rel_ids.push(rel_id);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let rel_id = sheet_rel_ids
        .get(active_tab)
        .ok_or(TemplateError::NoActiveSheet(active_tab))?;

    let rels = read_part(archive, WORKBOOK_RELS_PART)?;
    let mut reader = Reader::from_str(&rels);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attribute(&e, b"Id")?.as_deref() == Some(rel_id.as_str()) {
                    let target = attribute(&e, b"Target")?
                        .ok_or_else(|| TemplateError::MissingPart(format!("target of {rel_id}")))?;
                    return Ok(match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("xl/{target}"),
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(TemplateError::MissingPart(format!("worksheet for {rel_id}")))
}

fn parse_shared_strings(xml: &str) -> Result<Vec<String>, TemplateError> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"t" => in_text = in_item,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(strings)
}

fn patch_worksheet(
    sheet_path: &str,
    xml: &str,
    cells: &[CellWrite],
) -> Result<Vec<u8>, TemplateError> {
    let targets = cells
        .iter()
        .map(|cell| {
            CellRef::parse(cell.coordinate)
                .map(|cell_ref| (cell_ref, &cell.value))
                .ok_or_else(|| TemplateError::InvalidCoordinate(cell.coordinate.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 4096));
    let mut dimension: Option<Dimension> = None;
    let mut patched = false;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Empty(e) if e.local_name().as_ref() == b"dimension" => {
                dimension = attribute(&e, b"ref")?
                    .map(|raw| Dimension::parse(&raw))
                    .transpose()?;
                writer.write_event(Event::Empty(e))?;
            }
            Event::Start(e) if e.local_name().as_ref() == b"sheetData" => {
                let mut rows = read_rows(&mut reader)?;
                apply_writes(&mut rows, &targets, dimension.as_ref())?;
                write_sheet_data(&mut writer, e.into_owned(), &rows)?;
                patched = true;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"sheetData" => {
                let mut rows = Vec::new();
                apply_writes(&mut rows, &targets, dimension.as_ref())?;
                write_sheet_data(&mut writer, e.into_owned(), &rows)?;
                patched = true;
            }
            event => writer.write_event(event)?,
        }
    }

    if !patched {
        return Err(TemplateError::MissingSheetData(sheet_path.to_string()));
    }

    Ok(writer.into_inner())
}

fn read_rows(reader: &mut Reader<&[u8]>) -> Result<Vec<SheetRow>, TemplateError> {
    let mut rows: Vec<SheetRow> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"row" => {
                let number = row_number(&e, rows.last())?;
                let mut row = SheetRow::new(number, e.into_owned());
                read_row_children(reader, &mut row)?;
                rows.push(row);
            }
            Event::Empty(e) if e.local_name().as_ref() == b"row" => {
                let number = row_number(&e, rows.last())?;
                rows.push(SheetRow::new(number, e.into_owned()));
            }
            Event::End(e) if e.local_name().as_ref() == b"sheetData" => return Ok(rows),
            Event::Eof => return Err(TemplateError::Truncated("sheetData")),
            _ => {}
        }
    }
}

fn read_row_children(reader: &mut Reader<&[u8]>, row: &mut SheetRow) -> Result<(), TemplateError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"c" => {
                let column = cell_column(&e, row)?;
                let mut body = Vec::new();
                loop {
                    match reader.read_event()? {
                        Event::End(end) if end.local_name().as_ref() == b"c" => break,
                        Event::Eof => return Err(TemplateError::Truncated("c")),
                        event => body.push(event.into_owned()),
                    }
                }
                row.cells.push(SheetCell {
                    column,
                    start: e.into_owned(),
                    body,
                });
            }
            Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                let column = cell_column(&e, row)?;
                row.cells.push(SheetCell {
                    column,
                    start: e.into_owned(),
                    body: Vec::new(),
                });
            }
            Event::End(e) if e.local_name().as_ref() == b"row" => return Ok(()),
            Event::Eof => return Err(TemplateError::Truncated("row")),
            Event::Text(_) => {}
            event => row.trailing.push(event.into_owned()),
        }
    }
}

fn row_number(element: &BytesStart, previous: Option<&SheetRow>) -> Result<u32, TemplateError> {
    match attribute(element, b"r")? {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| TemplateError::InvalidCoordinate(raw)),
        None => Ok(previous.map_or(1, |row| row.number + 1)),
    }
}

fn cell_column(element: &BytesStart, row: &SheetRow) -> Result<u32, TemplateError> {
    match attribute(element, b"r")? {
        Some(raw) => CellRef::parse(&raw)
            .map(|cell| cell.column)
            .ok_or(TemplateError::InvalidCoordinate(raw)),
        None => Ok(row.cells.last().map_or(1, |cell| cell.column + 1)),
    }
}

fn apply_writes(
    rows: &mut Vec<SheetRow>,
    targets: &[(CellRef, &CellValue)],
    dimension: Option<&Dimension>,
) -> Result<(), TemplateError> {
    for (cell_ref, value) in targets {
        if let Some(dimension) = dimension {
            if !dimension.contains(*cell_ref) {
                return Err(TemplateError::OutOfRange {
                    coordinate: cell_ref.to_string(),
                    dimension: dimension.raw.clone(),
                });
            }
        }

        let row_index = match rows.binary_search_by_key(&cell_ref.row, |row| row.number) {
            Ok(index) => index,
            Err(index) => {
                let mut start = BytesStart::new("row");
                start.push_attribute(("r", cell_ref.row.to_string().as_str()));
                rows.insert(index, SheetRow::new(cell_ref.row, start));
                index
            }
        };
        let row = &mut rows[row_index];
        row.touched = true;

        let coordinate = cell_ref.to_string();
        match row
            .cells
            .binary_search_by_key(&cell_ref.column, |cell| cell.column)
        {
            Ok(index) => {
                let style = attribute(&row.cells[index].start, b"s")?;
                row.cells[index] = new_cell(cell_ref.column, &coordinate, style.as_deref(), value);
            }
            Err(index) => {
                row.cells
                    .insert(index, new_cell(cell_ref.column, &coordinate, None, value));
            }
        }
    }
    Ok(())
}

fn new_cell(column: u32, coordinate: &str, style: Option<&str>, value: &CellValue) -> SheetCell {
    let mut start = BytesStart::new("c");
    start.push_attribute(("r", coordinate));
    if let Some(style) = style {
        start.push_attribute(("s", style));
    }

    let body = match value {
        CellValue::Text(text) => {
            start.push_attribute(("t", "inlineStr"));
            let mut t = BytesStart::new("t");
            t.push_attribute(("xml:space", "preserve"));
            vec![
                Event::Start(BytesStart::new("is")),
                Event::Start(t),
                Event::Text(BytesText::new(text).into_owned()),
                Event::End(BytesEnd::new("t")),
                Event::End(BytesEnd::new("is")),
            ]
        }
        CellValue::Number(number) => vec![
            Event::Start(BytesStart::new("v")),
            Event::Text(BytesText::new(number).into_owned()),
            Event::End(BytesEnd::new("v")),
        ],
    };

    SheetCell {
        column,
        start,
        body,
    }
}

/// Row `spans` are a rendering hint that no longer holds once cells move.
fn without_spans(start: &BytesStart) -> Result<BytesStart<'static>, TemplateError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut rebuilt = BytesStart::new(name);
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() != b"spans" {
            rebuilt.push_attribute(attr);
        }
    }
    Ok(rebuilt)
}

fn write_sheet_data(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'static>,
    rows: &[SheetRow],
) -> Result<(), TemplateError> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;

    for row in rows {
        let start = if row.touched {
            without_spans(&row.start)?
        } else {
            row.start.clone()
        };

        if row.cells.is_empty() && row.trailing.is_empty() {
            writer.write_event(Event::Empty(start))?;
            continue;
        }

        let row_end = start.to_end().into_owned();
        writer.write_event(Event::Start(start))?;
        for cell in &row.cells {
            if cell.body.is_empty() {
                writer.write_event(Event::Empty(cell.start.clone()))?;
                continue;
            }
            let cell_end = cell.start.to_end().into_owned();
            writer.write_event(Event::Start(cell.start.clone()))?;
            for event in &cell.body {
                writer.write_event(event.clone())?;
            }
            writer.write_event(Event::End(cell_end))?;
        }
        for event in &row.trailing {
            writer.write_event(event.clone())?;
        }
        writer.write_event(Event::End(row_end))?;
    }

    writer.write_event(Event::End(end))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// A one-sheet workbook with a shared string in A1, a styled blank in
    /// B6 and a number in C2, declaring `dimension` as its used range.
    pub fn workbook(dimension: &str) -> Vec<u8> {
        let sheet = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><dimension ref="{dimension}"/><sheetViews><sheetView workbookViewId="0"/></sheetViews><sheetData><row r="1" spans="1:3"><c r="A1" t="s"><v>0</v></c></row><row r="2"><c r="C2"><v>42</v></c></row><row r="6" spans="2:2"><c r="B6" s="3"/></row></sheetData><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></worksheet>"#
        );
        build(&[
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#,
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><bookViews><workbookView activeTab="0"/></bookViews><sheets><sheet name="Formulario" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#,
            ),
            (
                "xl/sharedStrings.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="1" uniqueCount="1"><si><t>FORMULÁRIO</t></si></sst>"#,
            ),
            ("xl/worksheets/sheet1.xml", sheet.as_str()),
        ])
    }

    pub fn build(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            let options = SimpleFileOptions::default();
            for (name, body) in parts {
                zip.start_file(*name, options).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf.into_inner()
    }
}
