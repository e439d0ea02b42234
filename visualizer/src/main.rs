use iced::{
    widget::{
        button, canvas::Canvas, column, image, pick_list, row, scrollable, slider, stack, text,
        text_input, Column, Container, Row,
    },
    time, Alignment, Color, Element, Length, Subscription, Task, Theme,
};
use map::MarkerOverlay;
use pgcore::map::{MapView, TILE_SIZE};
use pgcore::panels::{ClimateMetric, StaticPanels, Tab, Trend};
use pgcore::recommendation::Calculation;
use pgcore::session::{
    field_specs, parse_saturating, InputField, InterpolationMode, PavementInputs, ViewState,
    WidgetKind,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

mod map;

static MODES: [InterpolationMode; 3] = InterpolationMode::ALL;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .theme(application_theme)
        .subscription(application_subscription)
        .run()
}

fn application_title(state: &Visualizer) -> String {
    state
        .panels
        .as_ref()
        .map(|panels| panels.title.clone())
        .unwrap_or_else(|| "PG Dashboard".into())
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Light
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(5)).map(|_| Message::Refresh)
}

fn dashboard_url() -> String {
    std::env::var("PG_DASHBOARD_URL").unwrap_or_else(|_| "http://127.0.0.1:9000".into())
}

#[derive(Debug)]
struct Visualizer {
    snapshot: Option<SessionSnapshot>,
    panels: Option<StaticPanels>,
    drafts: HashMap<InputField, String>,
    tab: Tab,
    tile: Option<image::Handle>,
    calculation: Option<Calculation>,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Refresh,
    SessionFetched(Result<SessionSnapshot, String>),
    PanelsFetched(Result<StaticPanels, String>),
    TileFetched(Result<Vec<u8>, String>),
    FieldChanged(InputField, String),
    SliderChanged(u32),
    ModeSelected(InterpolationMode),
    EditApplied(Result<EditReply, String>),
    TabSelected(Tab),
    Calculate,
    Calculated(Result<Calculation, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                snapshot: None,
                panels: None,
                drafts: HashMap::new(),
                tab: Tab::default(),
                tile: None,
                calculation: None,
                status: "Connecting to dashboard...".into(),
            },
            Task::batch([
                Task::perform(fetch_session(), Message::SessionFetched),
                Task::perform(fetch_panels(), Message::PanelsFetched),
            ]),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Refresh => Task::perform(fetch_session(), Message::SessionFetched),
            Message::SessionFetched(Ok(snapshot)) => {
                let previous = state.snapshot.take();
                match &previous {
                    Some(previous) => state.sync_drafts(&previous.inputs, &snapshot.inputs),
                    None => state.reset_drafts(&snapshot.inputs),
                }
                let tile_url = snapshot.map.center_tile_url();
                let refetch = state.tile.is_none()
                    || previous
                        .as_ref()
                        .map_or(true, |previous| previous.map.center_tile_url() != tile_url);
                if previous.is_none() {
                    state.status = format!("Session at {}", snapshot.map.caption);
                }
                state.snapshot = Some(snapshot);
                if refetch {
                    Task::perform(fetch_tile(tile_url), Message::TileFetched)
                } else {
                    Task::none()
                }
            }
            Message::SessionFetched(Err(err)) => {
                state.status = format!("Session error: {err}");
                Task::none()
            }
            Message::PanelsFetched(Ok(panels)) => {
                state.panels = Some(panels);
                Task::none()
            }
            Message::PanelsFetched(Err(err)) => {
                state.status = format!("Panels error: {err}");
                Task::none()
            }
            Message::TileFetched(Ok(bytes)) => {
                state.tile = Some(image::Handle::from_bytes(bytes));
                Task::none()
            }
            Message::TileFetched(Err(err)) => {
                // The map stays usable without its base layer.
                state.tile = None;
                state.status = format!("Map tile unavailable: {err}");
                Task::none()
            }
            Message::FieldChanged(field, value) => {
                let parsed = parse_saturating(&value);
                state.drafts.insert(field, value);
                match parsed {
                    Some(parsed) => state.submit(InputEdit::Field {
                        field: field.key().into(),
                        value: parsed,
                    }),
                    None => Task::none(),
                }
            }
            Message::SliderChanged(value) => {
                state
                    .drafts
                    .insert(InputField::Reliability, value.to_string());
                state.submit(InputEdit::Field {
                    field: InputField::Reliability.key().into(),
                    value: i64::from(value),
                })
            }
            Message::ModeSelected(mode) => state.submit(InputEdit::Mode {
                mode: mode.key().into(),
            }),
            Message::EditApplied(Ok(reply)) => {
                if reply.clamped {
                    state.reset_drafts(&reply.inputs);
                }
                if let Some(snapshot) = state.snapshot.as_mut() {
                    snapshot.inputs = reply.inputs;
                }
                Task::none()
            }
            Message::EditApplied(Err(err)) => {
                state.status = format!("Edit error: {err}");
                Task::none()
            }
            Message::TabSelected(tab) => {
                state.tab = tab;
                Task::none()
            }
            Message::Calculate => Task::perform(post_calculate(), Message::Calculated),
            Message::Calculated(Ok(calculation)) => {
                state.status = calculation.acknowledgement.clone();
                state.calculation = Some(calculation);
                Task::none()
            }
            Message::Calculated(Err(err)) => {
                state.status = format!("Calculation error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let layout = row![
            state.sidebar_column(),
            state.location_column(),
            state.tab_column(),
        ]
        .spacing(20)
        .align_y(Alignment::Start)
        .padding(20);

        let footer = state
            .panels
            .as_ref()
            .map(|panels| panels.footer.clone())
            .unwrap_or_default();

        Container::new(
            column![
                scrollable(layout).height(Length::Fill),
                text(footer).size(12),
            ]
            .spacing(8)
            .padding(8),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn sidebar_column(&self) -> Element<'_, Message> {
        let Some(panels) = &self.panels else {
            return column![text("Loading...").size(14)]
                .width(Length::Fixed(240.0))
                .into();
        };
        let sidebar = &panels.sidebar;
        let steps = sidebar.guide_steps.iter().enumerate().fold(
            Column::new().spacing(4),
            |col, (idx, step)| col.push(text(format!("{}. {}", idx + 1, step)).size(13)),
        );

        column![
            text("💡 Recomendaciones").size(22),
            text(format!("{}:", sidebar.guide_title)).size(16),
            steps,
            text(format!("ℹ️ {}", sidebar.about_title)).size(22),
            text(&sidebar.about).size(13),
            text(format!("Versión: {}", sidebar.version)).size(13),
            text(format!("Desarrollado para: {}", sidebar.audience)).size(13),
        ]
        .spacing(10)
        .width(Length::Fixed(240.0))
        .into()
    }

    fn location_column(&self) -> Element<'_, Message> {
        let mode = self.snapshot.as_ref().map(|snapshot| snapshot.inputs.mode);
        let map_view = self.snapshot.as_ref().map(|snapshot| &snapshot.map);

        let overlay = Canvas::new(MarkerOverlay::new(map_view, self.tile.is_some()))
            .width(Length::Fixed(TILE_SIZE as f32))
            .height(Length::Fixed(TILE_SIZE as f32));
        let map_panel: Element<'_, Message> = match &self.tile {
            Some(handle) => stack![
                image(handle.clone())
                    .width(Length::Fixed(TILE_SIZE as f32))
                    .height(Length::Fixed(TILE_SIZE as f32)),
                overlay,
            ]
            .into(),
            None => overlay.into(),
        };

        let (caption, location) = match &self.snapshot {
            Some(snapshot) => (
                snapshot.map.caption.clone(),
                snapshot.view.location_label().to_string(),
            ),
            None => ("n/a".to_string(), String::new()),
        };
        let point_mode = self
            .panels
            .as_ref()
            .map(|panels| panels.point_mode.clone())
            .unwrap_or_default();

        column![
            text("Modo de interpolación").size(18),
            pick_list(&MODES[..], mode, Message::ModeSelected),
            text("📍 Ubicación").size(18),
            map_panel,
            text("📌 Punto personalizado").size(18),
            text(format!("Coordenadas: {caption}")).size(13),
            text(format!("Modo: {point_mode}")).size(13),
            text(location).size(13),
            button("Refresh").on_press(Message::Refresh).padding(6),
            text(&self.status).size(12),
        ]
        .spacing(10)
        .width(Length::Fixed(300.0))
        .into()
    }

    fn tab_column(&self) -> Element<'_, Message> {
        let tabs = Tab::ALL.iter().fold(Row::new().spacing(6), |row, tab| {
            let style = if *tab == self.tab {
                button::primary
            } else {
                button::secondary
            };
            row.push(
                button(text(tab.title()).size(14))
                    .style(style)
                    .on_press(Message::TabSelected(*tab))
                    .padding(8),
            )
        });

        let body: Element<'_, Message> = match self.tab {
            Tab::Pavement => self.pavement_tab(),
            Tab::Climate => self.climate_tab(),
            other => self.placeholder_tab(other),
        };

        column![tabs, body]
            .spacing(16)
            .width(Length::Fill)
            .into()
    }

    fn pavement_tab(&self) -> Element<'_, Message> {
        let Some(snapshot) = &self.snapshot else {
            return text("Waiting for session...").size(14).into();
        };
        let inputs = &snapshot.inputs;

        let controls = field_specs().iter().fold(Column::new().spacing(8), |col, spec| {
            let field = spec.field;
            let control: Element<'_, Message> = match spec.widget {
                WidgetKind::Slider => slider(
                    spec.min..=spec.max,
                    inputs.get(field),
                    Message::SliderChanged,
                )
                .into(),
                WidgetKind::NumberInput => text_input(
                    spec.label,
                    self.drafts.get(&field).map(String::as_str).unwrap_or(""),
                )
                .on_input(move |value| Message::FieldChanged(field, value))
                .padding(6)
                .into(),
            };
            col.push(text(spec.label).size(16))
                .push(control)
                .push(text(inputs.echo(field)).size(14))
        });

        let mut content = column![
            text("🛣️ Parámetros del Pavimento").size(24),
            controls,
            button("💾 Guardar y Calcular")
                .on_press(Message::Calculate)
                .width(Length::Fill)
                .padding(12),
        ]
        .spacing(12);

        if let Some(calculation) = &self.calculation {
            let lines = calculation
                .summary
                .lines
                .iter()
                .fold(Column::new().spacing(4), |col, line| {
                    col.push(text(format!("- {line}")).size(13))
                });
            content = content
                .push(
                    text(format!("✅ {}", calculation.acknowledgement))
                        .color(Color::from_rgb(0.12, 0.42, 0.2)),
                )
                .push(text("Resultados del Cálculo").size(18))
                .push(text(calculation.summary.headline()).size(15))
                .push(text("Parámetros utilizados:").size(14))
                .push(lines);
        }

        content.into()
    }

    fn climate_tab(&self) -> Element<'_, Message> {
        let Some(panels) = &self.panels else {
            return text("Loading...").size(14).into();
        };
        let columns = panels
            .climate
            .columns
            .iter()
            .fold(Row::new().spacing(24), |row, metrics| {
                row.push(
                    metrics
                        .iter()
                        .fold(Column::new().spacing(12), |col, metric| {
                            col.push(metric_card(metric))
                        })
                        .width(Length::FillPortion(1)),
                )
            });

        column![text(format!("🌡️ {}", panels.climate.title)).size(24), columns]
            .spacing(12)
            .into()
    }

    fn placeholder_tab(&self, tab: Tab) -> Element<'_, Message> {
        let panel = self
            .panels
            .as_ref()
            .and_then(|panels| panels.placeholder(tab));
        match panel {
            Some(panel) => column![
                text(format!("{} {}", tab.icon(), panel.heading)).size(24),
                text(&panel.note).size(14),
            ]
            .spacing(12)
            .into(),
            None => text("Loading...").size(14).into(),
        }
    }

    fn reset_drafts(&mut self, inputs: &PavementInputs) {
        for field in InputField::ALL {
            self.drafts.insert(field, inputs.get(field).to_string());
        }
    }

    /// Only overwrites drafts for fields changed elsewhere, so text being typed survives a poll.
    fn sync_drafts(&mut self, previous: &PavementInputs, current: &PavementInputs) {
        for field in InputField::ALL {
            if previous.get(field) != current.get(field) {
                self.drafts.insert(field, current.get(field).to_string());
            }
        }
    }

    /// Sends one edit; any pending result is cleared until the next calculation.
    fn submit(&mut self, edit: InputEdit) -> Task<Message> {
        self.calculation = None;
        Task::perform(post_edit(edit), Message::EditApplied)
    }
}

fn metric_card(metric: &ClimateMetric) -> Element<'_, Message> {
    let mut card = column![
        text(&metric.label).size(14),
        text(&metric.value).size(26),
    ]
    .spacing(2);
    if let Some(delta) = &metric.delta {
        let color = match delta.trend {
            Trend::Up => Color::from_rgb(0.12, 0.55, 0.24),
            Trend::Down => Color::from_rgb(0.85, 0.19, 0.15),
        };
        card = card.push(text(delta.display()).size(13).color(color));
    }
    Container::new(card).padding(10).into()
}

async fn fetch_session() -> Result<SessionSnapshot, String> {
    let response = reqwest::get(format!("{}/api/session", dashboard_url()))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<SessionSnapshot>()
        .await
        .map_err(|e| e.to_string())
}

async fn fetch_panels() -> Result<StaticPanels, String> {
    let response = reqwest::get(format!("{}/api/panels", dashboard_url()))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<StaticPanels>()
        .await
        .map_err(|e| e.to_string())
}

async fn fetch_tile(url: String) -> Result<Vec<u8>, String> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("pg-dashboard-visualizer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| e.to_string())?;
    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| e.to_string())?;
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}

async fn post_edit(edit: InputEdit) -> Result<EditReply, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/inputs", dashboard_url()))
        .json(&edit)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        response.json::<EditReply>().await.map_err(|e| e.to_string())
    } else {
        Err(rejection_message(response).await)
    }
}

async fn post_calculate() -> Result<Calculation, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/calculate", dashboard_url()))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        response
            .json::<Calculation>()
            .await
            .map_err(|e| e.to_string())
    } else {
        Err(rejection_message(response).await)
    }
}

async fn rejection_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorReply>(&body) {
        Ok(reply) => format!("{}: {}", status, reply.message),
        Err(_) => format!("{}: {}", status, body),
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum InputEdit {
    Field { field: String, value: i64 },
    Mode { mode: String },
}

#[derive(Debug, Clone, Deserialize)]
struct EditReply {
    clamped: bool,
    inputs: PavementInputs,
}

#[derive(Debug, Clone, Deserialize)]
struct SessionSnapshot {
    view: ViewState,
    inputs: PavementInputs,
    map: MapView,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    message: String,
}
