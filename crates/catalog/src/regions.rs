//! Static administrative tables: province seats and the six-region grouping.

use foundation::math::LatLng;

/// A province with the coordinate of its provincial seat.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProvinceSeat {
    pub name: &'static str,
    pub region: Region,
    pub seat: LatLng,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    North,
    Northeast,
    Central,
    East,
    West,
    South,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::North,
        Region::Northeast,
        Region::Central,
        Region::East,
        Region::West,
        Region::South,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::North => "ภาคเหนือ",
            Region::Northeast => "ภาคตะวันออกเฉียงเหนือ",
            Region::Central => "ภาคกลาง",
            Region::East => "ภาคตะวันออก",
            Region::West => "ภาคตะวันตก",
            Region::South => "ภาคใต้",
        }
    }

    pub fn from_name(name: &str) -> Option<Region> {
        let name = name.trim();
        Region::ALL.into_iter().find(|r| r.name() == name)
    }

    /// Member province names, in table order.
    pub fn provinces(self) -> Vec<&'static str> {
        PROVINCES
            .iter()
            .filter(|p| p.region == self)
            .map(|p| p.name)
            .collect()
    }

    pub fn group(self) -> RegionGroup {
        RegionGroup {
            name: self.name().to_string(),
            provinces: self.provinces().into_iter().map(str::to_string).collect(),
        }
    }
}

/// A named set of province names selected as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGroup {
    pub name: String,
    pub provinces: Vec<String>,
}

pub fn region_groups() -> Vec<RegionGroup> {
    Region::ALL.into_iter().map(Region::group).collect()
}

pub fn province(name: &str) -> Option<&'static ProvinceSeat> {
    let name = name.trim();
    PROVINCES.iter().find(|p| p.name == name)
}

pub fn region_of(province_name: &str) -> Option<Region> {
    province(province_name).map(|p| p.region)
}

macro_rules! seat {
    ($name:literal, $region:ident, $lat:literal, $lng:literal) => {
        ProvinceSeat {
            name: $name,
            region: Region::$region,
            seat: LatLng::new($lat, $lng),
        }
    };
}

pub static PROVINCES: [ProvinceSeat; 77] = [
    // North
    seat!("เชียงราย", North, 19.9105, 99.8406),
    seat!("เชียงใหม่", North, 18.7883, 98.9853),
    seat!("น่าน", North, 18.7756, 100.7730),
    seat!("พะเยา", North, 19.1664, 99.9019),
    seat!("แพร่", North, 18.1446, 100.1403),
    seat!("แม่ฮ่องสอน", North, 19.3020, 97.9654),
    seat!("ลำปาง", North, 18.2888, 99.4908),
    seat!("ลำพูน", North, 18.5745, 99.0087),
    seat!("อุตรดิตถ์", North, 17.6201, 100.0993),
    // Northeast
    seat!("กาฬสินธุ์", Northeast, 16.4314, 103.5059),
    seat!("ขอนแก่น", Northeast, 16.4322, 102.8236),
    seat!("ชัยภูมิ", Northeast, 15.8068, 102.0316),
    seat!("นครพนม", Northeast, 17.3920, 104.7696),
    seat!("นครราชสีมา", Northeast, 14.9799, 102.0978),
    seat!("บึงกาฬ", Northeast, 18.3609, 103.6466),
    seat!("บุรีรัมย์", Northeast, 14.9930, 103.1029),
    seat!("มหาสารคาม", Northeast, 16.1851, 103.3026),
    seat!("มุกดาหาร", Northeast, 16.5436, 104.7024),
    seat!("ยโสธร", Northeast, 15.7944, 104.1453),
    seat!("ร้อยเอ็ด", Northeast, 16.0538, 103.6520),
    seat!("เลย", Northeast, 17.4860, 101.7223),
    seat!("ศรีสะเกษ", Northeast, 15.1186, 104.3220),
    seat!("สกลนคร", Northeast, 17.1664, 104.1486),
    seat!("สุรินทร์", Northeast, 14.8818, 103.4936),
    seat!("หนองคาย", Northeast, 17.8783, 102.7420),
    seat!("หนองบัวลำภู", Northeast, 17.2218, 102.4260),
    seat!("อำนาจเจริญ", Northeast, 15.8657, 104.6258),
    seat!("อุดรธานี", Northeast, 17.4138, 102.7872),
    seat!("อุบลราชธานี", Northeast, 15.2287, 104.8564),
    // Central
    seat!("กรุงเทพมหานคร", Central, 13.7563, 100.5018),
    seat!("กำแพงเพชร", Central, 16.4828, 99.5227),
    seat!("ชัยนาท", Central, 15.1851, 100.1251),
    seat!("นครนายก", Central, 14.2069, 101.2131),
    seat!("นครปฐม", Central, 13.8199, 100.0622),
    seat!("นครสวรรค์", Central, 15.7047, 100.1372),
    seat!("นนทบุรี", Central, 13.8621, 100.5144),
    seat!("ปทุมธานี", Central, 14.0208, 100.5250),
    seat!("พระนครศรีอยุธยา", Central, 14.3692, 100.5877),
    seat!("พิจิตร", Central, 16.4429, 100.3487),
    seat!("พิษณุโลก", Central, 16.8211, 100.2659),
    seat!("เพชรบูรณ์", Central, 16.4190, 101.1606),
    seat!("ลพบุรี", Central, 14.7995, 100.6534),
    seat!("สมุทรปราการ", Central, 13.5991, 100.5998),
    seat!("สมุทรสงคราม", Central, 13.4098, 100.0023),
    seat!("สมุทรสาคร", Central, 13.5475, 100.2744),
    seat!("สิงห์บุรี", Central, 14.8936, 100.3967),
    seat!("สุโขทัย", Central, 17.0056, 99.8264),
    seat!("สุพรรณบุรี", Central, 14.4745, 100.1177),
    seat!("สระบุรี", Central, 14.5289, 100.9101),
    seat!("อ่างทอง", Central, 14.5896, 100.4551),
    seat!("อุทัยธานี", Central, 15.3835, 100.0246),
    // East
    seat!("จันทบุรี", East, 12.6114, 102.1039),
    seat!("ฉะเชิงเทรา", East, 13.6904, 101.0779),
    seat!("ชลบุรี", East, 13.3611, 100.9847),
    seat!("ตราด", East, 12.2428, 102.5175),
    seat!("ปราจีนบุรี", East, 14.0509, 101.3717),
    seat!("ระยอง", East, 12.6814, 101.2816),
    seat!("สระแก้ว", East, 13.8240, 102.0646),
    // West
    seat!("กาญจนบุรี", West, 14.0228, 99.5328),
    seat!("ตาก", West, 16.8840, 99.1258),
    seat!("ประจวบคีรีขันธ์", West, 11.8126, 99.7957),
    seat!("เพชรบุรี", West, 13.1119, 99.9447),
    seat!("ราชบุรี", West, 13.5283, 99.8134),
    // South
    seat!("กระบี่", South, 8.0863, 98.9063),
    seat!("ชุมพร", South, 10.4930, 99.1800),
    seat!("ตรัง", South, 7.5563, 99.6114),
    seat!("นครศรีธรรมราช", South, 8.4304, 99.9631),
    seat!("นราธิวาส", South, 6.4255, 101.8253),
    seat!("ปัตตานี", South, 6.8696, 101.2501),
    seat!("พังงา", South, 8.4510, 98.5255),
    seat!("พัทลุง", South, 7.6167, 100.0740),
    seat!("ภูเก็ต", South, 7.8804, 98.3923),
    seat!("ยะลา", South, 6.5411, 101.2804),
    seat!("ระนอง", South, 9.9529, 98.6085),
    seat!("สงขลา", South, 7.1898, 100.5954),
    seat!("สตูล", South, 6.6238, 100.0674),
    seat!("สุราษฎร์ธานี", South, 9.1382, 99.3217),
];
