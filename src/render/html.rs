use crate::error::Result;
use crate::model::CanonicalEvent;
use chrono::SecondsFormat;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const STYLE: &str = "\
body{font-family:Arial,Helvetica,sans-serif;margin:20px;}
table{border-collapse:collapse;width:100%;}
th,td{border:1px solid #ddd;padding:6px;vertical-align:top;}
th{background:#f2f2f2;cursor:pointer;white-space:nowrap;}
tr:nth-child(even){background:#fafafa;}
td.message{white-space:pre-wrap;}
input{margin-bottom:10px;padding:6px;width:300px;}";

// Click-a-header sorting plus live substring search; no external requests.
const SCRIPT: &str = "\
const table=document.getElementById('events');
const headers=table.querySelectorAll('th');
headers.forEach((th,idx)=>{
  th.addEventListener('click',()=>{
    const rows=[...table.tBodies[0].rows];
    const asc=th.asc=!th.asc;
    rows.sort((a,b)=>{
      const av=a.cells[idx].innerText.trim().toLowerCase();
      const bv=b.cells[idx].innerText.trim().toLowerCase();
      return av.localeCompare(bv)*(asc?1:-1);
    });
    rows.forEach(r=>table.tBodies[0].appendChild(r));
  });
});
document.getElementById('searchBox').addEventListener('input',function(){
  const q=this.value.toLowerCase();
  [...table.tBodies[0].rows].forEach(r=>{
    r.style.display=[...r.cells].some(c=>c.innerText.toLowerCase().includes(q))?'':'none';
  });
});";

/// Self-contained report: inline style, inline script, no external assets,
/// so the file stays browsable offline and safe to archive.
pub fn write_html(events: &[CanonicalEvent], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>Audit Trail</title>")?;
    writeln!(out, "<style>{STYLE}</style>")?;
    writeln!(out, "</head><body>")?;
    writeln!(out, "<h2>Audit Trail ({} events)</h2>", events.len())?;
    writeln!(
        out,
        "<input type=\"text\" id=\"searchBox\" placeholder=\"Search...\">"
    )?;
    writeln!(out, "<table id=\"events\">")?;

    write!(out, "<thead><tr>")?;
    for column in super::COLUMNS {
        write!(out, "<th>{}</th>", escape(column))?;
    }
    writeln!(out, "</tr></thead><tbody>")?;

    for event in events {
        let timestamp = event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        write!(out, "<tr>")?;
        cell(&mut out, Some(event.source.as_str()), "")?;
        cell(&mut out, Some(&event.action_type), "")?;
        cell(&mut out, event.user_name.as_deref(), "")?;
        cell(&mut out, event.user_email.as_deref(), "")?;
        cell(&mut out, Some(&timestamp), "")?;
        cell(&mut out, event.ref_name.as_deref(), "")?;
        cell(&mut out, event.commit_sha.as_deref(), "")?;
        cell(&mut out, event.message.as_deref(), " class=\"message\"")?;
        cell(&mut out, event.url.as_deref(), "")?;
        writeln!(out, "</tr>")?;
    }

    writeln!(out, "</tbody></table>")?;
    writeln!(out, "<script>{SCRIPT}</script>")?;
    writeln!(out, "</body></html>")?;

    out.flush()?;
    Ok(())
}

fn cell<W: Write>(out: &mut W, value: Option<&str>, attrs: &str) -> Result<()> {
    write!(out, "<td{attrs}>{}</td>", escape(value.unwrap_or("")))?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
