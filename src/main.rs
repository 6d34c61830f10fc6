use iced::widget::image::{Handle, Image};
use iced::widget::{
    button, column, container, mouse_area, row, scrollable, slider, text, Space, Stack,
};
use iced::{mouse, Alignment, Background, Border, Color, ContentFit, Element, Length, Padding};
use iced::{Point, Size, Subscription, Task, Theme};
use rfd::FileDialog;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use image_grid::state::batch::DecodedBatch;
use image_grid::state::settings::{CORNER_RADIUS_RANGE, GAP_RANGE, IMAGE_SIZE_RANGE};
use image_grid::{
    decode_batch, Breakpoint, DataUriDecoder, FileHandle, GridMetrics, GridState, Tile,
    VerticalCompactor,
};

/// Window width assumed until the first resize event arrives
const INITIAL_WIDTH: f32 = 1200.0;

/// Extensions offered by the file picker
const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff", "ico"];

/// Which handle of a tile the pointer grabbed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureKind {
    Move,
    Resize,
}

/// A drag or resize in progress
#[derive(Debug, Clone)]
struct Gesture {
    id: String,
    kind: GestureKind,
    /// Pointer position when the handle was pressed
    origin: Point,
}

/// Main application state
struct ImageGridApp {
    /// Authoritative images + layout
    grid: GridState,
    /// Decoded texture handles, keyed by image id
    handles: HashMap<String, Handle>,
    decoder: Arc<DataUriDecoder>,
    /// Current window width in pixels
    width: f32,
    /// Status message to display to the user
    status: String,
    /// Last pointer position over the grid
    cursor: Point,
    gesture: Option<Gesture>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Upload Images" button
    UploadImages,
    /// Every file of an upload has finished decoding
    BatchDecoded(DecodedBatch),
    /// User clicked the remove button on a tile
    RemoveImage(String),
    ImageSizeChanged(u32),
    GapChanged(u32),
    CornerRadiusChanged(u32),
    WindowResized(Size),
    /// User pressed a tile's drag handle or resize corner
    GestureStarted(String, GestureKind),
    PointerMoved(Point),
    PointerReleased,
}

impl ImageGridApp {
    fn new() -> (Self, Task<Message>) {
        info!("🎨 Image grid started");
        (
            ImageGridApp {
                grid: GridState::new(),
                handles: HashMap::new(),
                decoder: Arc::new(DataUriDecoder),
                width: INITIAL_WIDTH,
                status: "Upload images to start".to_string(),
                cursor: Point::ORIGIN,
                gesture: None,
            },
            Task::none(),
        )
    }

    fn columns(&self) -> u32 {
        Breakpoint::for_width(self.width).columns
    }

    fn metrics(&self) -> GridMetrics {
        let settings = self.grid.settings();
        GridMetrics::new(
            self.width,
            self.columns(),
            settings.row_height_pixels as f32,
            settings.gap_pixels as f32,
        )
    }

    /// Turn a finished gesture into a layout edit and re-pack the grid
    fn finish_gesture(&mut self, gesture: Gesture) {
        let Some(tile) = self.grid.tile(&gesture.id) else {
            return;
        };
        let Some(y) = tile.placement.y() else {
            return;
        };
        let (x, w, h) = (tile.placement.x(), tile.w, tile.h);

        let metrics = self.metrics();
        let dx = self.cursor.x - gesture.origin.x;
        let dy = self.cursor.y - gesture.origin.y;

        let changed = match gesture.kind {
            GestureKind::Move => {
                let (x, y) = metrics.cell_at(metrics.left(x) + dx, metrics.top(y) + dy, w);
                self.grid.move_tile(&gesture.id, x, y)
            }
            GestureKind::Resize => {
                let (w, h) = metrics.span_for(metrics.width(w) + dx, metrics.height(h) + dy);
                self.grid.resize_tile(&gesture.id, w, h)
            }
        };

        if changed {
            info!(id = %gesture.id, kind = ?gesture.kind, "✋ Tile rearranged");
            self.relayout();
        }
    }

    /// Compaction pass after every change, fed back into the grid state
    fn relayout(&mut self) {
        let cols = self.columns();
        self.grid.relayout(&VerticalCompactor, cols);
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UploadImages => {
                let picked = FileDialog::new()
                    .set_title("Select Images")
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .pick_files();

                if let Some(paths) = picked {
                    self.status = format!("Loading {} files...", paths.len());
                    let files: Vec<FileHandle> = paths.into_iter().map(FileHandle::from).collect();

                    return Task::perform(
                        decode_batch(Arc::clone(&self.decoder), files),
                        Message::BatchDecoded,
                    );
                }

                Task::none()
            }
            Message::BatchDecoded(batch) => {
                let failed = batch.failed();
                let added = self.grid.commit_batch(batch);

                for id in &added {
                    if let Some(tile) = self.grid.tile(id) {
                        self.handles
                            .insert(id.clone(), Handle::from_bytes(tile.image.src.bytes().to_vec()));
                    }
                }
                self.relayout();

                self.status = if failed > 0 {
                    format!("Added {} images, {} could not be read.", added.len(), failed)
                } else {
                    format!("Added {} images.", added.len())
                };
                Task::none()
            }
            Message::RemoveImage(id) => {
                if self.grid.remove_image(&id) {
                    self.handles.remove(&id);
                    self.relayout();
                }
                Task::none()
            }
            Message::ImageSizeChanged(units) => {
                self.grid.set_image_size_units(i64::from(units));
                self.relayout();
                Task::none()
            }
            Message::GapChanged(px) => {
                self.grid.set_gap(i64::from(px));
                Task::none()
            }
            Message::CornerRadiusChanged(px) => {
                self.grid.set_corner_radius(i64::from(px));
                Task::none()
            }
            Message::WindowResized(size) => {
                let before = self.columns();
                self.width = size.width;
                if self.columns() != before {
                    info!(columns = self.columns(), "📐 Breakpoint changed");
                    self.relayout();
                }
                Task::none()
            }
            Message::GestureStarted(id, kind) => {
                self.gesture = Some(Gesture {
                    id,
                    kind,
                    origin: self.cursor,
                });
                Task::none()
            }
            Message::PointerMoved(position) => {
                self.cursor = position;
                Task::none()
            }
            Message::PointerReleased => {
                if let Some(gesture) = self.gesture.take() {
                    self.finish_gesture(gesture);
                }
                Task::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size))
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let settings = self.grid.settings();

        let controls = row![
            button("Upload Images")
                .on_press(Message::UploadImages)
                .padding(10),
            labelled_slider(
                "Size:",
                slider(IMAGE_SIZE_RANGE, settings.image_size_units, Message::ImageSizeChanged),
                settings.image_size_units.to_string(),
            ),
            labelled_slider(
                "Gap:",
                slider(GAP_RANGE, settings.gap_pixels, Message::GapChanged),
                format!("{}px", settings.gap_pixels),
            ),
            labelled_slider(
                "Corners:",
                slider(CORNER_RADIUS_RANGE, settings.corner_radius_pixels, Message::CornerRadiusChanged),
                format!("{}px", settings.corner_radius_pixels),
            ),
        ]
        .spacing(24)
        .align_y(Alignment::Center);

        let body: Element<Message> = if self.grid.is_empty() {
            container(
                column![
                    text("Upload images to start").size(24),
                    text("Use the controls above to select files from your computer."),
                ]
                .spacing(8)
                .align_x(Alignment::Center),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
        } else {
            scrollable(self.grid_view()).height(Length::Fill).into()
        };

        column![controls, text(&self.status).size(14), body]
            .spacing(16)
            .padding(16)
            .into()
    }

    /// Tiles absolutely positioned from their grid cells
    fn grid_view(&self) -> Element<Message> {
        let metrics = self.metrics();
        let radius = self.grid.settings().corner_radius_pixels as f32;

        let rows = self
            .grid
            .layout()
            .map(|l| l.placement.y().unwrap_or(0).saturating_add(l.h))
            .max()
            .unwrap_or(0);

        let mut layers: Vec<Element<Message>> = vec![Space::new(
            Length::Fixed(self.width),
            Length::Fixed(metrics.top(rows)),
        )
        .into()];

        for tile in self.grid.tiles() {
            let Some(handle) = self.handles.get(tile.id()) else {
                warn!(id = tile.id(), "Handle not found for tile");
                continue;
            };
            let Some(y) = tile.placement.y() else {
                continue;
            };

            let card = tile_card(tile, handle.clone(), radius)
                .width(Length::Fixed(metrics.width(tile.w)))
                .height(Length::Fixed(metrics.height(tile.h)));

            layers.push(
                container(card)
                    .padding(Padding {
                        top: metrics.top(y),
                        right: 0.0,
                        bottom: 0.0,
                        left: metrics.left(tile.placement.x()),
                    })
                    .into(),
            );
        }

        mouse_area(Stack::with_children(layers))
            .on_move(Message::PointerMoved)
            .on_release(Message::PointerReleased)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// One image tile with its remove button, drag handle and resize corner
fn tile_card(tile: &Tile, handle: Handle, radius: f32) -> iced::widget::Container<'_, Message> {
    let picture = Image::new(handle)
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(ContentFit::Cover);

    let remove = container(
        button(text("✕").size(12))
            .on_press(Message::RemoveImage(tile.id().to_string()))
            .padding(2),
    )
    .padding(4)
    .align_right(Length::Fill);

    let mut layers: Vec<Element<Message>> = vec![picture.into(), remove.into()];

    if tile.is_draggable != Some(false) {
        let grip = mouse_area(container(text("⠿").size(14)).padding(4))
            .on_press(Message::GestureStarted(tile.id().to_string(), GestureKind::Move))
            .interaction(mouse::Interaction::Grab);
        layers.push(container(grip).padding(4).into());
    }
    if tile.is_resizable != Some(false) {
        let corner = mouse_area(container(text("◢").size(12)).padding(2))
            .on_press(Message::GestureStarted(tile.id().to_string(), GestureKind::Resize))
            .interaction(mouse::Interaction::Crosshair);
        layers.push(
            container(corner)
                .align_right(Length::Fill)
                .align_bottom(Length::Fill)
                .into(),
        );
    }

    container(Stack::with_children(layers)).style(move |_theme: &Theme| {
        container::Style {
            background: Some(Background::Color(Color::from_rgb8(0xE5, 0xE7, 0xEB))),
            border: Border {
                radius: radius.into(),
                ..Border::default()
            },
            ..container::Style::default()
        }
    })
}

fn labelled_slider<'a>(
    label: &'a str,
    slider: iced::widget::Slider<'a, u32, Message>,
    value: String,
) -> Element<'a, Message> {
    row![
        text(label).size(14),
        slider.width(Length::Fixed(96.0)),
        text(value).size(14),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application("Image Grid", ImageGridApp::update, ImageGridApp::view)
        .subscription(ImageGridApp::subscription)
        .theme(ImageGridApp::theme)
        .centered()
        .run_with(ImageGridApp::new)
}
