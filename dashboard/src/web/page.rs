//! Server-side rendering of the dashboard page.
//!
//! The page is rebuilt from scratch on every request: session snapshot in,
//! HTML out. Leaflet draws the map in the browser; when tiles fail to load the
//! map stays blank and the rest of the page is unaffected.

use crate::web::model::SessionSnapshot;
use pgcore::map::MAX_ZOOM;
use pgcore::panels::{ClimateMetric, StaticPanels, Tab};
use pgcore::recommendation::Calculation;
use pgcore::session::{field_specs, InterpolationMode, WidgetKind};

const STYLE: &str = r#"
    body { margin: 0; font-family: "Source Sans Pro", system-ui, sans-serif; background-color: #f0f2f6; color: #31333f; }
    .layout { display: flex; min-height: 100vh; }
    .sidebar { width: 300px; padding: 24px; background: #ffffff; box-shadow: 2px 0 4px rgba(0,0,0,0.05); }
    .main { flex: 1; padding: 24px 40px; }
    .columns { display: flex; gap: 32px; align-items: flex-start; }
    .col-left { flex: 1; }
    .col-right { flex: 2; }
    h1 { color: #31333f; padding: 20px; background-color: #F0F2F6; border-radius: 10px; margin-bottom: 30px; }
    .tabs { display: flex; gap: 8px; border-bottom: 1px solid #d0d3da; margin-bottom: 16px; }
    .tabs a { padding: 8px 14px; text-decoration: none; color: #31333f; border-bottom: 3px solid transparent; }
    .tabs a.active { border-bottom-color: #ff4b4b; font-weight: 600; }
    .info { background: #e8f0fe; color: #1c4f9c; padding: 12px 16px; border-radius: 8px; margin: 8px 0; }
    .success { background: #e6f4ea; color: #1e6b34; padding: 12px 16px; border-radius: 8px; margin: 8px 0; }
    .metric-box { background-color: white; padding: 15px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); margin-bottom: 10px; }
    .metric-value { font-size: 28px; }
    .delta-up { color: #1e8e3e; } .delta-down { color: #d93025; }
    .metric-columns { display: flex; gap: 16px; } .metric-columns > div { flex: 1; }
    input[type=number], select { width: 100%; padding: 8px; border-radius: 6px; border: 1px solid #d0d3da; }
    input[type=range] { width: 100%; }
    button { background-color: #6366f1; color: white; width: 100%; padding: 15px; font-size: 16px; border-radius: 8px; border: none; cursor: pointer; }
    button:hover { background-color: #4f46e5; }
    #map { border-radius: 8px; }
    footer { margin-top: 40px; border-top: 1px solid #d0d3da; padding-top: 12px; color: #6b6f7b; }
"#;

const SCRIPT: &str = r#"
    async function pushEdit(body) {
      const response = await fetch('/api/inputs', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
      });
      if (!response.ok) { return null; }
      return response.json();
    }
    function clearResult() {
      const result = document.getElementById('result');
      if (result) { result.remove(); }
    }
    document.querySelectorAll('[data-field]').forEach((input) => {
      input.addEventListener('change', async () => {
        const field = input.dataset.field;
        const raw = input.value.trim();
        if (raw === '') { return; }
        const reply = await pushEdit({ field, value: Number(raw) });
        if (!reply) { return; }
        clearResult();
        input.value = reply.inputs[field];
        const echo = document.getElementById('echo-' + field);
        if (echo) { echo.textContent = reply.inputs[field] + ' ' + input.dataset.unit; }
      });
    });
    const modeSelect = document.getElementById('mode');
    if (modeSelect) {
      modeSelect.addEventListener('change', async () => {
        if (await pushEdit({ mode: modeSelect.value })) { clearResult(); }
      });
    }
"#;

/// Inputs for one page render.
pub struct PageContext<'a> {
    pub snapshot: &'a SessionSnapshot,
    pub panels: &'a StaticPanels,
    pub tab: Tab,
    pub calculation: Option<&'a Calculation>,
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a value for a single-quoted JavaScript string literal.
fn escape_js(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('<', "\\x3c")
}

pub fn render_page(ctx: &PageContext<'_>) -> String {
    let title = escape_html(&ctx.panels.title);
    format!(
        r#"<!doctype html>
<html lang="es">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{title}</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>
  <style>{style}</style>
</head>
<body>
<div class="layout">
{sidebar}
<main class="main">
  <h1>🛣️ {title}</h1>
  <h3>{subtitle}</h3>
  <div class="columns">
    <section class="col-left">
{left}
    </section>
    <section class="col-right">
{tabs}
{tab_body}
    </section>
  </div>
  <footer>{footer}</footer>
</main>
</div>
<script>{script}</script>
{map_script}
</body>
</html>
"#,
        title = title,
        style = STYLE,
        sidebar = render_sidebar(ctx.panels),
        subtitle = escape_html(&ctx.panels.subtitle),
        left = render_left_column(ctx),
        tabs = render_tab_strip(ctx.tab),
        tab_body = render_tab_body(ctx),
        footer = escape_html(&ctx.panels.footer),
        script = SCRIPT,
        map_script = render_map_script(ctx.snapshot),
    )
}

fn render_sidebar(panels: &StaticPanels) -> String {
    let sidebar = &panels.sidebar;
    let steps: String = sidebar
        .guide_steps
        .iter()
        .map(|step| format!("<li>{}</li>", escape_html(step)))
        .collect();
    format!(
        r#"<aside class="sidebar">
  <h2>💡 Recomendaciones</h2>
  <div class="info"><h3>{guide_title}:</h3><ol>{steps}</ol></div>
  <h2>ℹ️ {about_title}</h2>
  <p>{about}</p>
  <p><strong>Versión:</strong> {version}</p>
  <p><strong>Desarrollado para:</strong> {audience}</p>
</aside>"#,
        guide_title = escape_html(&sidebar.guide_title),
        steps = steps,
        about_title = escape_html(&sidebar.about_title),
        about = escape_html(&sidebar.about),
        version = escape_html(&sidebar.version),
        audience = escape_html(&sidebar.audience),
    )
}

fn render_left_column(ctx: &PageContext<'_>) -> String {
    let snapshot = ctx.snapshot;
    let options: String = InterpolationMode::ALL
        .iter()
        .map(|mode| {
            let selected = if *mode == snapshot.inputs.mode {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                mode.key(),
                selected,
                escape_html(mode.label())
            )
        })
        .collect();

    format!(
        r#"      <h3>Modo de interpolación</h3>
      <select id="mode" name="mode" form="pg-form">{options}</select>
      <h3>📍 Ubicación</h3>
      <div id="map" style="width: {width}px; height: {height}px;"></div>
      <h3>📌 Punto personalizado</h3>
      <p><strong>Coordenadas:</strong> {caption}</p>
      <p><strong>Modo:</strong> {point_mode}</p>
      <div class="info">{location}</div>"#,
        options = options,
        width = snapshot.map.width,
        height = snapshot.map.height,
        caption = escape_html(&snapshot.map.caption),
        point_mode = escape_html(&ctx.panels.point_mode),
        location = escape_html(snapshot.view.location_label()),
    )
}

fn render_tab_strip(active: Tab) -> String {
    let links: String = Tab::ALL
        .iter()
        .map(|tab| {
            let class = if *tab == active { " class=\"active\"" } else { "" };
            format!(
                r#"<a href="/?tab={}"{}>{}</a>"#,
                tab.key(),
                class,
                tab.title()
            )
        })
        .collect();
    format!(r#"      <nav class="tabs">{}</nav>"#, links)
}

fn render_tab_body(ctx: &PageContext<'_>) -> String {
    match ctx.tab {
        Tab::Pavement => render_pavement_tab(ctx),
        Tab::Climate => render_climate_tab(ctx.panels),
        other => match ctx.panels.placeholder(other) {
            Some(panel) => format!(
                r#"<h2>{} {}</h2><div class="info">{}</div>"#,
                other.icon(),
                escape_html(&panel.heading),
                escape_html(&panel.note)
            ),
            None => String::new(),
        },
    }
}

fn render_pavement_tab(ctx: &PageContext<'_>) -> String {
    let inputs = &ctx.snapshot.inputs;
    let mut controls = String::new();
    for spec in field_specs() {
        let key = spec.field.key();
        let value = inputs.get(spec.field);
        let kind = match spec.widget {
            WidgetKind::NumberInput => "number",
            WidgetKind::Slider => "range",
        };
        controls.push_str(&format!(
            r#"<h3>{label}</h3>
<input type="{kind}" id="{key}" name="{key}" data-field="{key}" data-unit="{unit}" min="{min}" max="{max}" step="{step}" value="{value}" />
<p><strong id="echo-{key}">{echo}</strong></p>
"#,
            label = escape_html(spec.label),
            kind = kind,
            key = key,
            unit = escape_html(spec.unit),
            min = spec.min,
            max = spec.max,
            step = spec.step,
            value = value,
            echo = escape_html(&spec.echo(value)),
        ));
    }

    let result = ctx
        .calculation
        .map(render_result)
        .unwrap_or_default();

    format!(
        r#"<h2>🛣️ Parámetros del Pavimento</h2>
<form id="pg-form" method="post" action="/calculate">
{controls}<br />
<button type="submit">💾 Guardar y Calcular</button>
</form>
{result}"#,
        controls = controls,
        result = result,
    )
}

fn render_result(calculation: &Calculation) -> String {
    let lines: String = calculation
        .summary
        .lines
        .iter()
        .map(|line| format!("<li>{}</li>", escape_html(line)))
        .collect();
    format!(
        r#"<div id="result">
<div class="success">✅ {ack}</div>
<h3>Resultados del Cálculo</h3>
<div class="info">
  <p><strong>Performance Grade Recomendado:</strong> {grade}</p>
  <p><strong>Parámetros utilizados:</strong></p>
  <ul>{lines}</ul>
</div>
</div>"#,
        ack = escape_html(&calculation.acknowledgement),
        grade = calculation.summary.grade,
        lines = lines,
    )
}

fn render_metric(metric: &ClimateMetric) -> String {
    let delta = metric
        .delta
        .as_ref()
        .map(|delta| {
            let class = match delta.trend {
                pgcore::panels::Trend::Up => "delta-up",
                pgcore::panels::Trend::Down => "delta-down",
            };
            format!(
                r#"<div class="{}">{}</div>"#,
                class,
                escape_html(&delta.display())
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div class="metric-box"><div>{}</div><div class="metric-value">{}</div>{}</div>"#,
        escape_html(&metric.label),
        escape_html(&metric.value),
        delta
    )
}

fn render_climate_tab(panels: &StaticPanels) -> String {
    let columns: String = panels
        .climate
        .columns
        .iter()
        .map(|column| {
            let metrics: String = column.iter().map(render_metric).collect();
            format!("<div>{}</div>", metrics)
        })
        .collect();
    format!(
        r#"<h2>🌡️ {}</h2><div class="metric-columns">{}</div>"#,
        escape_html(&panels.climate.title),
        columns
    )
}

fn render_map_script(snapshot: &SessionSnapshot) -> String {
    let map = &snapshot.map;
    // Coordinates are emitted with full precision so the marker does not drift.
    format!(
        r#"<script>
    if (window.L) {{
      const center = [{lat:?}, {lon:?}];
      const map = L.map('map').setView(center, {zoom});
      L.tileLayer('{tiles}', {{ maxZoom: {max_zoom}, attribution: '{attribution}' }}).addTo(map);
      const icon = L.divIcon({{ className: 'marker-{color}', html: '<span style="color: {color}; font-size: 28px;">&#9873;</span>' }});
      L.marker([{mlat:?}, {mlon:?}], {{ icon, title: '{glyph}' }}).addTo(map).bindPopup('{popup}');
    }}
</script>"#,
        lat = map.center.latitude(),
        lon = map.center.longitude(),
        zoom = map.zoom,
        max_zoom = MAX_ZOOM,
        tiles = escape_js(&map.tile_url),
        attribution = escape_js(&map.attribution),
        color = escape_js(&escape_html(&map.marker.icon.color)),
        glyph = escape_js(&map.marker.icon.glyph),
        mlat = map.marker.position.latitude(),
        mlon = map.marker.position.longitude(),
        popup = escape_js(&escape_html(&map.marker.popup)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::runner::Runner;
    use pgcore::map::MapSettings;
    use pgcore::recommendation::FixedGradeRecommender;
    use pgcore::session::{Session, ViewState};
    use std::sync::Arc;

    fn fixture() -> (Runner, Session) {
        let runner = Runner::new(
            Arc::new(FixedGradeRecommender::default()),
            MapSettings::default(),
        );
        let session = Session::start(ViewState::default(), Arc::default());
        (runner, session)
    }

    #[test]
    fn pavement_tab_renders_controls_and_echoes() {
        let (runner, session) = fixture();
        let snapshot = runner.snapshot(&session);
        let panels = StaticPanels::new();
        let html = render_page(&PageContext {
            snapshot: &snapshot,
            panels: &panels,
            tab: Tab::Pavement,
            calculation: None,
        });

        assert!(html.contains(r#"name="esal""#));
        assert!(html.contains(r#"type="range" id="reliability""#));
        assert!(html.contains(r#"<strong id="echo-esal">35 mill.</strong>"#));
        assert!(html.contains("12.0437°S, 77.0427°W"));
        assert!(html.contains("Buscando ubicación..."));
        assert!(!html.contains("Resultados del Cálculo"));
    }

    #[test]
    fn result_section_appears_after_calculation() {
        let (runner, session) = fixture();
        let snapshot = runner.snapshot(&session);
        let panels = StaticPanels::new();
        let calc = runner.calculate(&session);
        let html = render_page(&PageContext {
            snapshot: &snapshot,
            panels: &panels,
            tab: Tab::Pavement,
            calculation: Some(&calc),
        });

        assert!(html.contains("Parámetros guardados correctamente"));
        assert!(html.contains("PG 64-22"));
        assert!(html.contains("Velocidad de tráfico: 40 km/h"));
    }

    #[test]
    fn result_fragment_sits_in_one_removable_container() {
        let (runner, session) = fixture();
        let fragment = render_result(&runner.calculate(&session));
        assert!(fragment.starts_with(r#"<div id="result">"#));
        assert!(fragment.ends_with("</div>\n</div>"));
        let ack = fragment.find("class=\"success\"").unwrap();
        let heading = fragment.find("Resultados del Cálculo").unwrap();
        assert!(ack < heading);
        assert_eq!(fragment.matches(r#"id="result""#).count(), 1);

        assert!(SCRIPT.contains("getElementById('result')"));
        assert!(SCRIPT.contains("clearResult();"));
    }

    #[test]
    fn cleared_number_box_is_not_pushed() {
        assert!(SCRIPT.contains("if (raw === '') { return; }"));
        assert!(!SCRIPT.contains("|| '0'"));
    }

    #[test]
    fn map_script_uses_exact_coordinate() {
        let (runner, session) = fixture();
        let snapshot = runner.snapshot(&session);
        let script = render_map_script(&snapshot);
        assert!(script.contains("-12.04374415711892"));
        assert!(script.contains("-77.04273545646473"));
        assert!(script.contains("Punto Personalizado"));
        assert!(script.contains("maxZoom: 19"));
    }

    #[test]
    fn climate_tab_lists_placeholder_metrics() {
        let (runner, session) = fixture();
        let snapshot = runner.snapshot(&session);
        let panels = StaticPanels::new();
        let html = render_page(&PageContext {
            snapshot: &snapshot,
            panels: &panels,
            tab: Tab::Climate,
            calculation: None,
        });
        assert!(html.contains("Radiación Solar"));
        assert!(html.contains("↑ 2°C"));
        assert!(!html.contains("pg-form\" method"));
    }

    #[test]
    fn escape_js_quotes_single_quotes() {
        assert_eq!(escape_js("O'Higgins"), "O\\'Higgins");
        assert_eq!(escape_js("</script>"), "\\x3c/script>");
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<b>\"Lima\" & 'Callao'</b>"),
            "&lt;b&gt;&quot;Lima&quot; &amp; &#39;Callao&#39;&lt;/b&gt;"
        );
    }
}
