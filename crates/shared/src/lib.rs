use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

pub use kurbo;

/// Уникальный идентификатор объекта на карте
pub type ObjectId = String;

/// Текущая версия формата снимка сцены
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

fn identity() -> Affine {
    Affine::IDENTITY
}

fn default_opacity() -> f64 {
    1.0
}

// ============================================================================
// Базовые типы
// ============================================================================

/// RGB-цвет (прозрачность хранится отдельно у объектов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Цвет в виде `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Тип зоны
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Attacker,
    Defender,
    Custom,
}

/// Сторона конфликта (для иконок отрядов и полос развёртывания)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

impl From<Side> for ZoneKind {
    fn from(side: Side) -> Self {
        match side {
            Side::Attacker => ZoneKind::Attacker,
            Side::Defender => ZoneKind::Defender,
        }
    }
}

/// Ось, вдоль которой разрешено масштабирование измерительной линии
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Идентификатор иконки в библиотеке ассетов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKey {
    Objective,
    StrikeForce,
    AttackerUnit,
    DefenderUnit,
}

impl IconKey {
    /// Имя PNG-файла иконки
    pub fn file_name(&self) -> &'static str {
        match self {
            IconKey::Objective => "objective.png",
            IconKey::StrikeForce => "strike_force.png",
            IconKey::AttackerUnit => "attacker_unit.png",
            IconKey::DefenderUnit => "defender_unit.png",
        }
    }

    pub fn all() -> &'static [IconKey] {
        &[
            IconKey::Objective,
            IconKey::StrikeForce,
            IconKey::AttackerUnit,
            IconKey::DefenderUnit,
        ]
    }
}

/// Ссылка на иконку с её естественным размером в пикселях
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRef {
    pub key: IconKey,
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// Варианты объектов
// ============================================================================

/// Геометрия зоны в локальных координатах объекта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ZoneShape {
    /// Многоугольник; порядок вершин = порядок кликов
    Polygon { vertices: Vec<Point> },
    /// Прямоугольник с левым верхним углом в локальном (0, 0)
    Rectangle { width: f64, height: f64 },
}

impl ZoneShape {
    /// Вершины контура в локальных координатах
    pub fn vertices(&self) -> Vec<Point> {
        match self {
            ZoneShape::Polygon { vertices } => vertices.clone(),
            ZoneShape::Rectangle { width, height } => vec![
                Point::new(0.0, 0.0),
                Point::new(*width, 0.0),
                Point::new(*width, *height),
                Point::new(0.0, *height),
            ],
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            ZoneShape::Polygon { vertices } => vertices.len(),
            ZoneShape::Rectangle { .. } => 4,
        }
    }
}

/// Залитая зона (область развёртывания, зона контроля и т.п.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub shape: ZoneShape,
    pub fill: Color,
    pub opacity: f64,
}

/// Маркер с фиксированной иконкой (цель, ударная группа); масштаб хранится в трансформации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub icon: IconRef,
}

/// Иконка отряда с регулируемой прозрачностью
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitIcon {
    pub icon: IconRef,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

/// Измерительная линия со стрелками на концах и подписью длины
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementAid {
    /// Ось фиксируется при создании и не меняется
    pub axis: Axis,
    /// Длина линии в пикселях холста
    pub length: f64,
    pub label: String,
    pub color: Color,
}

impl MeasurementAid {
    /// Конечная точка линии в локальных координатах (начало в (0, 0))
    pub fn end(&self) -> Point {
        match self.axis {
            Axis::Horizontal => Point::new(self.length, 0.0),
            Axis::Vertical => Point::new(0.0, self.length),
        }
    }
}

/// Текстовая подпись; локальное начало координат в центре текста
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub font_size: f64,
    pub color: Color,
}

impl Label {
    /// Приблизительный габарит текста (без шрифтовых метрик)
    pub fn approx_size(&self) -> (f64, f64) {
        let chars = self.text.chars().count().max(1) as f64;
        (chars * self.font_size * 0.6, self.font_size * 1.2)
    }
}

/// Группа: жёсткий набор дочерних объектов в локальных координатах группы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub children: Vec<SceneObject>,
}

/// Временная точка, отмечающая клик при рисовании зоны
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingMarker {
    pub radius: f64,
    pub color: Color,
}

/// Временный отрезок между точками рисуемой зоны
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingLine {
    pub from: Point,
    pub to: Point,
    pub color: Color,
}

/// Вариант объекта; тег `name` служит единственным дискриминант при сохранении/загрузке
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ObjectKind {
    AttackerZone(Zone),
    DefenderZone(Zone),
    CustomZone(Zone),
    ObjectiveMarker(Marker),
    StrikeForceMarker(Marker),
    AttackerUnit(UnitIcon),
    DefenderUnit(UnitIcon),
    MeasurementGroup(MeasurementAid),
    ZoneLabel(Label),
    Group(Group),
    // ── Временные объекты рисования (никогда не сохраняются) ──
    DrawingMarker(DrawingMarker),
    DrawingLine(DrawingLine),
    ZonePreview(Zone),
}

impl ObjectKind {
    /// Зона заданного типа
    pub fn zone(kind: ZoneKind, zone: Zone) -> Self {
        match kind {
            ZoneKind::Attacker => ObjectKind::AttackerZone(zone),
            ZoneKind::Defender => ObjectKind::DefenderZone(zone),
            ZoneKind::Custom => ObjectKind::CustomZone(zone),
        }
    }

    /// Иконка отряда заданной стороны
    pub fn unit(side: Side, unit: UnitIcon) -> Self {
        match side {
            Side::Attacker => ObjectKind::AttackerUnit(unit),
            Side::Defender => ObjectKind::DefenderUnit(unit),
        }
    }

    /// Строковое имя варианта (совпадает с тегом в JSON)
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::AttackerZone(_) => "attacker_zone",
            ObjectKind::DefenderZone(_) => "defender_zone",
            ObjectKind::CustomZone(_) => "custom_zone",
            ObjectKind::ObjectiveMarker(_) => "objective_marker",
            ObjectKind::StrikeForceMarker(_) => "strike_force_marker",
            ObjectKind::AttackerUnit(_) => "attacker_unit",
            ObjectKind::DefenderUnit(_) => "defender_unit",
            ObjectKind::MeasurementGroup(_) => "measurement_group",
            ObjectKind::ZoneLabel(_) => "zone_label",
            ObjectKind::Group(_) => "group",
            ObjectKind::DrawingMarker(_) => "drawing_marker",
            ObjectKind::DrawingLine(_) => "drawing_line",
            ObjectKind::ZonePreview(_) => "zone_preview",
        }
    }

    /// Зона пользователя (без превью)
    pub fn as_zone(&self) -> Option<(ZoneKind, &Zone)> {
        match self {
            ObjectKind::AttackerZone(z) => Some((ZoneKind::Attacker, z)),
            ObjectKind::DefenderZone(z) => Some((ZoneKind::Defender, z)),
            ObjectKind::CustomZone(z) => Some((ZoneKind::Custom, z)),
            _ => None,
        }
    }

    pub fn as_zone_mut(&mut self) -> Option<&mut Zone> {
        match self {
            ObjectKind::AttackerZone(z) | ObjectKind::DefenderZone(z) | ObjectKind::CustomZone(z) => {
                Some(z)
            }
            _ => None,
        }
    }

    pub fn as_unit(&self) -> Option<(Side, &UnitIcon)> {
        match self {
            ObjectKind::AttackerUnit(u) => Some((Side::Attacker, u)),
            ObjectKind::DefenderUnit(u) => Some((Side::Defender, u)),
            _ => None,
        }
    }

    pub fn as_unit_mut(&mut self) -> Option<&mut UnitIcon> {
        match self {
            ObjectKind::AttackerUnit(u) | ObjectKind::DefenderUnit(u) => Some(u),
            _ => None,
        }
    }
}

// ============================================================================
// Объект сцены
// ============================================================================

/// Размещённый объект: идентификатор, аффинная трансформация и вариант
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    #[serde(default = "identity")]
    pub transform: Affine,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            transform: Affine::IDENTITY,
            kind,
        }
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Временный объект рисования
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            ObjectKind::DrawingMarker(_) | ObjectKind::DrawingLine(_) | ObjectKind::ZonePreview(_)
        )
    }

    /// Маркеры, отряды и измерительные линии держатся над зонами;
    /// группа из одних таких объектов тоже
    pub fn is_marker_like(&self) -> bool {
        match &self.kind {
            ObjectKind::Group(g) => !g.children.is_empty() && g.children.iter().all(|c| c.is_marker_like()),
            kind => matches!(
                kind,
                ObjectKind::ObjectiveMarker(_)
                    | ObjectKind::StrikeForceMarker(_)
                    | ObjectKind::AttackerUnit(_)
                    | ObjectKind::DefenderUnit(_)
                    | ObjectKind::MeasurementGroup(_)
            ),
        }
    }

    /// Зона пользователя или группа, содержащая зону
    pub fn is_zone_like(&self) -> bool {
        match &self.kind {
            ObjectKind::Group(g) => g.children.iter().any(|c| c.is_zone_like()),
            kind => kind.as_zone().is_some(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ObjectKind::Group(_))
    }

    /// Индексы (зона, подпись), если это группа «зона с текстом»
    pub fn labelled_zone_parts(&self) -> Option<(usize, usize)> {
        let ObjectKind::Group(group) = &self.kind else {
            return None;
        };
        if group.children.len() != 2 {
            return None;
        }
        let zone = group.children.iter().position(|c| c.kind.as_zone().is_some())?;
        let label = group
            .children
            .iter()
            .position(|c| matches!(c.kind, ObjectKind::ZoneLabel(_)))?;
        Some((zone, label))
    }

    /// Содержит ли объект (рекурсивно) измерительную линию
    pub fn contains_measurement(&self) -> bool {
        match &self.kind {
            ObjectKind::MeasurementGroup(_) => true,
            ObjectKind::Group(g) => g.children.iter().any(|c| c.contains_measurement()),
            _ => false,
        }
    }

    /// Габарит в локальных координатах (до применения `transform`)
    pub fn local_bounds(&self) -> Rect {
        match &self.kind {
            ObjectKind::AttackerZone(z)
            | ObjectKind::DefenderZone(z)
            | ObjectKind::CustomZone(z)
            | ObjectKind::ZonePreview(z) => points_bounds(&z.shape.vertices()),
            ObjectKind::ObjectiveMarker(m) | ObjectKind::StrikeForceMarker(m) => {
                centered_rect(m.icon.width as f64, m.icon.height as f64)
            }
            ObjectKind::AttackerUnit(u) | ObjectKind::DefenderUnit(u) => {
                centered_rect(u.icon.width as f64, u.icon.height as f64)
            }
            ObjectKind::MeasurementGroup(m) => Rect::from_points(Point::ORIGIN, m.end()),
            ObjectKind::ZoneLabel(l) => {
                let (w, h) = l.approx_size();
                centered_rect(w, h)
            }
            ObjectKind::Group(g) => g
                .children
                .iter()
                .map(|c| c.bounds(Affine::IDENTITY))
                .reduce(|a, b| a.union(b))
                .unwrap_or(Rect::ZERO),
            ObjectKind::DrawingMarker(m) => centered_rect(m.radius * 2.0, m.radius * 2.0),
            ObjectKind::DrawingLine(l) => Rect::from_points(l.from, l.to),
        }
    }

    /// Габарит в системе координат родителя с трансформацией `parent`
    pub fn bounds(&self, parent: Affine) -> Rect {
        (parent * self.transform).transform_rect_bbox(self.local_bounds())
    }

    /// Положение объекта (смещение трансформации)
    pub fn position(&self) -> Point {
        self.transform.translation().to_point()
    }
}

fn centered_rect(width: f64, height: f64) -> Rect {
    Rect::new(-width / 2.0, -height / 2.0, width / 2.0, height / 2.0)
}

fn points_bounds(points: &[Point]) -> Rect {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

// ============================================================================
// Снимок сцены
// ============================================================================

/// Переносимый снимок сцены (только пользовательские объекты, снизу вверх)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Версия формата
    #[serde(default = "default_version")]
    pub version: u32,
    pub objects: Vec<SceneObject>,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            objects: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(val: &T) {
        let json = serde_json::to_string(val).expect("serialize");
        let back: T = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(*val, back);
    }

    fn triangle() -> Zone {
        Zone {
            shape: ZoneShape::Polygon {
                vertices: vec![
                    Point::new(0.0, 0.0),
                    Point::new(100.0, 0.0),
                    Point::new(100.0, 100.0),
                ],
            },
            fill: Color::RED,
            opacity: 0.3,
        }
    }

    fn objective_icon() -> IconRef {
        IconRef {
            key: IconKey::Objective,
            width: 64,
            height: 32,
        }
    }

    // --- Имена вариантов ---

    #[test]
    fn test_zone_name_is_serde_tag() {
        let obj = SceneObject::new("z1".into(), ObjectKind::zone(ZoneKind::Attacker, triangle()));
        let json = serde_json::to_string(&obj).unwrap();
        assert!(json.contains(r#""name":"attacker_zone""#));
        assert_eq!(obj.name(), "attacker_zone");
    }

    #[test]
    fn test_every_name_matches_tag() {
        let kinds = vec![
            ObjectKind::zone(ZoneKind::Defender, triangle()),
            ObjectKind::zone(ZoneKind::Custom, triangle()),
            ObjectKind::ObjectiveMarker(Marker { icon: objective_icon() }),
            ObjectKind::StrikeForceMarker(Marker { icon: objective_icon() }),
            ObjectKind::unit(Side::Defender, UnitIcon { icon: objective_icon(), opacity: 0.5 }),
            ObjectKind::MeasurementGroup(MeasurementAid {
                axis: Axis::Vertical,
                length: 100.0,
                label: "5.0\"".into(),
                color: Color::BLUE,
            }),
            ObjectKind::ZoneLabel(Label {
                text: "Objective A".into(),
                font_size: 16.0,
                color: Color::BLACK,
            }),
            ObjectKind::Group(Group { children: vec![] }),
        ];
        for kind in kinds {
            let value = serde_json::to_value(SceneObject::new("x".into(), kind.clone())).unwrap();
            assert_eq!(value["name"], kind.name());
        }
    }

    #[test]
    fn test_preview_is_not_a_user_zone() {
        let preview = SceneObject::new("p".into(), ObjectKind::ZonePreview(triangle()));
        assert!(preview.is_transient());
        assert!(preview.kind.as_zone().is_none());
        assert!(!preview.is_zone_like());
    }

    // --- Сериализация ---

    #[test]
    fn test_scene_object_roundtrip() {
        let obj = SceneObject::new("z1".into(), ObjectKind::zone(ZoneKind::Custom, triangle()))
            .with_transform(Affine::translate((20.0, 40.0)));
        roundtrip(&obj);
    }

    #[test]
    fn test_group_roundtrip_keeps_children_order() {
        let zone = SceneObject::new("z".into(), ObjectKind::zone(ZoneKind::Attacker, triangle()));
        let label = SceneObject::new(
            "l".into(),
            ObjectKind::ZoneLabel(Label {
                text: "Hold".into(),
                font_size: 16.0,
                color: Color::BLACK,
            }),
        );
        let group = SceneObject::new(
            "g".into(),
            ObjectKind::Group(Group {
                children: vec![zone, label],
            }),
        );
        roundtrip(&group);
        assert_eq!(group.labelled_zone_parts(), Some((0, 1)));
    }

    #[test]
    fn test_missing_transform_defaults_to_identity() {
        let json = r#"{"id":"m","name":"objective_marker","icon":{"key":"objective","width":10,"height":10}}"#;
        let obj: SceneObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.transform, Affine::IDENTITY);
        assert!(obj.is_marker_like());
    }

    #[test]
    fn test_marker_only_group_is_marker_like() {
        let marker = |id: &str| SceneObject::new(id.into(), ObjectKind::ObjectiveMarker(Marker { icon: objective_icon() }));
        let zone = SceneObject::new("z".into(), ObjectKind::zone(ZoneKind::Attacker, triangle()));
        let group = |children| SceneObject::new("g".into(), ObjectKind::Group(Group { children }));

        assert!(group(vec![marker("a"), marker("b")]).is_marker_like());
        assert!(group(vec![group(vec![marker("a")]), marker("b")]).is_marker_like());
        assert!(!group(vec![marker("a"), zone]).is_marker_like());
        assert!(!group(vec![]).is_marker_like());
    }

    #[test]
    fn test_unknown_name_rejected() {
        let json = r#"{"id":"m","name":"dragon","radius":3}"#;
        assert!(serde_json::from_str::<SceneObject>(json).is_err());
    }

    #[test]
    fn test_snapshot_default_version() {
        let snap: SceneSnapshot = serde_json::from_str(r#"{"objects":[]}"#).unwrap();
        assert_eq!(snap.version, SNAPSHOT_VERSION);
    }

    // --- Геометрия ---

    #[test]
    fn test_rectangle_vertices() {
        let shape = ZoneShape::Rectangle { width: 240.0, height: 120.0 };
        let v = shape.vertices();
        assert_eq!(v.len(), 4);
        assert_eq!(v[2], Point::new(240.0, 120.0));
    }

    #[test]
    fn test_bounds_apply_transform() {
        let obj = SceneObject::new("z".into(), ObjectKind::zone(ZoneKind::Attacker, triangle()))
            .with_transform(Affine::translate((10.0, 20.0)));
        let b = obj.bounds(Affine::IDENTITY);
        assert_eq!(b, Rect::new(10.0, 20.0, 110.0, 120.0));
    }

    #[test]
    fn test_marker_bounds_centered() {
        let obj = SceneObject::new("m".into(), ObjectKind::ObjectiveMarker(Marker { icon: objective_icon() }));
        assert_eq!(obj.local_bounds(), Rect::new(-32.0, -16.0, 32.0, 16.0));
    }

    #[test]
    fn test_contains_measurement_recurses() {
        let aid = SceneObject::new(
            "a".into(),
            ObjectKind::MeasurementGroup(MeasurementAid {
                axis: Axis::Horizontal,
                length: 100.0,
                label: String::new(),
                color: Color::BLUE,
            }),
        );
        let inner = SceneObject::new("g1".into(), ObjectKind::Group(Group { children: vec![aid] }));
        let outer = SceneObject::new("g2".into(), ObjectKind::Group(Group { children: vec![inner] }));
        assert!(outer.contains_measurement());
    }
}
