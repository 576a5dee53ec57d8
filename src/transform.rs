/// A 4x4 transformation matrix stored in row-major order.
///
/// Effects write one of these onto an element (magnetic translation, card
/// tilt, parallax offset) or hand it out per frame (particles). Composition
/// follows CSS transform lists: `a.then(&b)` is the matrix for `a b`, which
/// applies `b` to the element first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Matrix data in row-major order: [row0, row1, row2, row3]
    pub data: [f32; 16],
}

impl Transform {
    /// Identity matrix (no transformation)
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, 0.0, // row 0
            0.0, 1.0, 0.0, 0.0, // row 1
            0.0, 0.0, 1.0, 0.0, // row 2
            0.0, 0.0, 0.0, 1.0, // row 3
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, x, // row 0
                0.0, 1.0, 0.0, y, // row 1
                0.0, 0.0, 1.0, 0.0, // row 2
                0.0, 0.0, 0.0, 1.0, // row 3
            ],
        }
    }

    pub fn translate_y(y: f32) -> Self {
        Self::translate(0.0, y)
    }

    /// Rotation in the screen plane (CSS `rotate`)
    pub fn rotate_degrees(angle_degrees: f32) -> Self {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        Self {
            data: [
                cos, -sin, 0.0, 0.0, // row 0
                sin, cos, 0.0, 0.0, // row 1
                0.0, 0.0, 1.0, 0.0, // row 2
                0.0, 0.0, 0.0, 1.0, // row 3
            ],
        }
    }

    /// Rotation around the horizontal axis (CSS `rotateX`)
    pub fn rotate_x_degrees(angle_degrees: f32) -> Self {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // row 0
                0.0, cos, -sin, 0.0, // row 1
                0.0, sin, cos, 0.0, // row 2
                0.0, 0.0, 0.0, 1.0, // row 3
            ],
        }
    }

    /// Rotation around the vertical axis (CSS `rotateY`)
    pub fn rotate_y_degrees(angle_degrees: f32) -> Self {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        Self {
            data: [
                cos, 0.0, sin, 0.0, // row 0
                0.0, 1.0, 0.0, 0.0, // row 1
                -sin, 0.0, cos, 0.0, // row 2
                0.0, 0.0, 0.0, 1.0, // row 3
            ],
        }
    }

    pub fn scale(s: f32) -> Self {
        Self {
            data: [
                s, 0.0, 0.0, 0.0, // row 0
                0.0, s, 0.0, 0.0, // row 1
                0.0, 0.0, 1.0, 0.0, // row 2
                0.0, 0.0, 0.0, 1.0, // row 3
            ],
        }
    }

    /// CSS `perspective(d)`. A non-positive distance yields the identity.
    pub fn perspective(distance: f32) -> Self {
        if distance <= 0.0 {
            return Self::IDENTITY;
        }
        let mut t = Self::IDENTITY;
        t.data[14] = -1.0 / distance;
        t
    }

    /// Compose this transform with another: self * other
    /// Applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Transform {
        let a = &self.data;
        let b = &other.data;

        let mut result = [0.0f32; 16];
        for i in 0..4 {
            for j in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += a[i * 4 + k] * b[k * 4 + j];
                }
                result[i * 4 + j] = sum;
            }
        }

        Transform { data: result }
    }

    /// Map a point on the element plane (z = 0), including the perspective
    /// divide.
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let d = &self.data;
        let new_x = d[0] * x + d[1] * y + d[3];
        let new_y = d[4] * x + d[5] * y + d[7];
        let w = d[12] * x + d[13] * y + d[15];
        if w.abs() < 1e-10 {
            return (new_x, new_y);
        }
        (new_x / w, new_y / w)
    }

    pub fn rows(&self) -> [[f32; 4]; 4] {
        [
            [self.data[0], self.data[1], self.data[2], self.data[3]],
            [self.data[4], self.data[5], self.data[6], self.data[7]],
            [self.data[8], self.data[9], self.data[10], self.data[11]],
            [self.data[12], self.data[13], self.data[14], self.data[15]],
        ]
    }

    /// CSS `matrix3d(...)` value. CSS lists the matrix column by column.
    pub fn to_css(&self) -> String {
        if self.is_identity() {
            return "none".to_string();
        }
        let d = &self.data;
        let columns: Vec<String> = (0..4)
            .flat_map(|col| (0..4).map(move |row| d[row * 4 + col].to_string()))
            .collect();
        format!("matrix3d({})", columns.join(", "))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
