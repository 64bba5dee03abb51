use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use shared::{Color, ObjectId, ZoneKind};

use super::scene::SceneGraph;
use super::settings::{ClosurePolicy, EditorSettings, ZoneStyle};
use crate::error::{EditorError, EditorResult};
use crate::factory::{drawing_line, drawing_marker, zone_from_points, zone_preview};
use crate::geometry::{bounds_of, hex_to_rgb, within_unit};

// ============================================================================
// Фазы рисования зоны
// ============================================================================

/// Фаза машины состояний рисования
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawingPhase {
    /// Рисование не идёт, холст работает в обычном режиме
    Idle,
    /// Накопление точек по кликам
    PlacingPoints,
    /// Контур замкнут, ждём выбора типа зоны
    AwaitingZoneClassification,
    /// Выбор цвета пользовательской зоны (с живым превью)
    AwaitingColorSelection { color: Color, opacity: f64 },
}

/// Исход диалога классификации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneChoice {
    Attacker,
    Defender,
    Custom,
    Cancel,
}

/// Результат клика по холсту
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Не в фазе расстановки точек
    Ignored,
    /// Точка добавлена в буфер
    Placed(Point),
    /// Контур замкнут, ждём классификации
    Closed,
}

// ============================================================================
// ZoneDrawing
// ============================================================================

/// Рисование многоугольной зоны по точкам.
///
/// Все временные объекты (маркеры, отрезки, превью) живут в сцене, но их
/// идентификаторы хранятся здесь, поэтому отмена из любой фазы удаляет
/// их полностью.
pub struct ZoneDrawing {
    phase: DrawingPhase,
    /// Привязанные к сетке точки в порядке кликов
    points: Vec<Point>,
    /// Временные маркеры и отрезки
    artifacts: Vec<ObjectId>,
    /// Текущее превью пользовательской зоны
    preview: Option<ObjectId>,
}

impl Default for ZoneDrawing {
    fn default() -> Self {
        Self {
            phase: DrawingPhase::Idle,
            points: Vec::new(),
            artifacts: Vec::new(),
            preview: None,
        }
    }
}

impl ZoneDrawing {
    pub fn phase(&self) -> DrawingPhase {
        self.phase
    }

    /// Буфер точек
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Габарит уже поставленных точек
    pub fn outline_bounds(&self) -> Option<Rect> {
        bounds_of(&self.points)
    }

    /// Идёт ли рисование (любая фаза кроме Idle)
    pub fn is_active(&self) -> bool {
        self.phase != DrawingPhase::Idle
    }

    /// Временные объекты текущего сеанса рисования
    pub fn artifact_ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.artifacts.iter().chain(self.preview.iter())
    }

    /// Начать рисование: сбросить буфер и заблокировать выделение
    pub fn start(&mut self, scene: &mut SceneGraph) {
        if self.is_active() {
            self.cancel(scene);
        }
        self.points.clear();
        scene.selection.lock();
        self.phase = DrawingPhase::PlacingPoints;
        tracing::debug!("Zone drawing started");
    }

    /// Клик по холсту (координаты до привязки)
    pub fn click(&mut self, scene: &mut SceneGraph, settings: &EditorSettings, raw: Point) -> ClickOutcome {
        if self.phase != DrawingPhase::PlacingPoints {
            return ClickOutcome::Ignored;
        }
        let p = settings.canvas.snap(raw);
        let unit = settings.canvas.grid_unit;
        let style = &settings.style;

        // Явное замыкание: минимум 3 точки проверяется раньше близости
        if settings.drawing.closure == ClosurePolicy::ExplicitClose
            && self.points.len() >= 3
            && within_unit(p, self.points[0], unit)
        {
            self.close(scene, settings);
            return ClickOutcome::Closed;
        }

        if let Some(&prev) = self.points.last() {
            self.artifacts.push(scene.add(drawing_line(prev, p, style)));
        }
        self.artifacts.push(scene.add(drawing_marker(p, style)));
        self.points.push(p);
        tracing::debug!("Zone point {} at ({}, {})", self.points.len(), p.x, p.y);

        match settings.drawing.closure.auto_close_at() {
            Some(n) if self.points.len() >= n => {
                self.close(scene, settings);
                ClickOutcome::Closed
            }
            _ => ClickOutcome::Placed(p),
        }
    }

    fn close(&mut self, scene: &mut SceneGraph, settings: &EditorSettings) {
        if let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) {
            self.artifacts.push(scene.add(drawing_line(last, first, &settings.style)));
        }
        self.phase = DrawingPhase::AwaitingZoneClassification;
        tracing::debug!("Zone closed with {} points", self.points.len());
    }

    /// Выбор в диалоге классификации. Возвращает ID созданной зоны для
    /// attacker/defender, `None` для custom (переход к выбору цвета) и cancel.
    pub fn classify(
        &mut self,
        scene: &mut SceneGraph,
        settings: &EditorSettings,
        choice: ZoneChoice,
    ) -> EditorResult<Option<ObjectId>> {
        if self.phase != DrawingPhase::AwaitingZoneClassification {
            return Err(EditorError::InvalidAction("no closed zone awaiting classification"));
        }
        match choice {
            ZoneChoice::Attacker | ZoneChoice::Defender => {
                let kind = if choice == ZoneChoice::Attacker {
                    ZoneKind::Attacker
                } else {
                    ZoneKind::Defender
                };
                let style = settings.palette.style_for(kind);
                self.finish(scene, kind, style).map(Some)
            }
            ZoneChoice::Custom => {
                let style = settings.palette.custom;
                self.phase = DrawingPhase::AwaitingColorSelection {
                    color: style.color,
                    opacity: style.opacity,
                };
                self.refresh_preview(scene, style.color, style.opacity);
                Ok(None)
            }
            ZoneChoice::Cancel => {
                self.cancel(scene);
                Ok(None)
            }
        }
    }

    /// Новый цвет/прозрачность из диалога. Неразборчивый цвет оставляет
    /// последний корректный.
    pub fn update_color(&mut self, scene: &mut SceneGraph, hex: &str, opacity: f64) -> EditorResult<()> {
        let DrawingPhase::AwaitingColorSelection { color: current, .. } = self.phase else {
            return Err(EditorError::InvalidAction("not selecting a zone color"));
        };
        match hex_to_rgb(hex) {
            Some(color) => self.set_color(scene, color, opacity),
            None => {
                tracing::warn!("Malformed color {hex:?}, keeping {}", current.to_hex());
                self.set_color(scene, current, opacity)?;
                Err(EditorError::MalformedColor(hex.to_string()))
            }
        }
    }

    /// Установить цвет превью (превью заменяется, а не добавляется)
    pub fn set_color(&mut self, scene: &mut SceneGraph, color: Color, opacity: f64) -> EditorResult<()> {
        if !matches!(self.phase, DrawingPhase::AwaitingColorSelection { .. }) {
            return Err(EditorError::InvalidAction("not selecting a zone color"));
        }
        let opacity = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 0.0 };
        self.phase = DrawingPhase::AwaitingColorSelection { color, opacity };
        self.refresh_preview(scene, color, opacity);
        Ok(())
    }

    fn refresh_preview(&mut self, scene: &mut SceneGraph, color: Color, opacity: f64) {
        if let Some(old) = self.preview.take() {
            scene.remove(&old);
        }
        self.preview = Some(scene.add(zone_preview(&self.points, color, opacity)));
    }

    /// Подтвердить пользовательскую зону
    pub fn confirm(&mut self, scene: &mut SceneGraph) -> EditorResult<ObjectId> {
        let DrawingPhase::AwaitingColorSelection { color, opacity } = self.phase else {
            return Err(EditorError::InvalidAction("not selecting a zone color"));
        };
        self.finish(scene, ZoneKind::Custom, ZoneStyle { color, opacity })
    }

    fn finish(&mut self, scene: &mut SceneGraph, kind: ZoneKind, style: ZoneStyle) -> EditorResult<ObjectId> {
        let zone = zone_from_points(kind, &self.points, style);
        // Временные объекты убираются в любом случае
        self.cancel(scene);
        let id = scene.add(zone?);
        scene.selection.select(id.clone());
        tracing::info!("Created {:?} zone {}", kind, super::scene::short_id(&id));
        Ok(id)
    }

    /// Отмена из любой фазы: удалить все временные объекты, очистить
    /// буфер, разблокировать выделение
    pub fn cancel(&mut self, scene: &mut SceneGraph) {
        for id in self.artifacts.drain(..).chain(self.preview.take()) {
            scene.remove(&id);
        }
        self.points.clear();
        scene.selection.unlock();
        if self.phase != DrawingPhase::Idle {
            tracing::debug!("Zone drawing ended");
        }
        self.phase = DrawingPhase::Idle;
    }
}
