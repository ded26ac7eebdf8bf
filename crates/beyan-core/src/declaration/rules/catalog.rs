//! Built-in rule list for the monthly KDV return (form 1015A).

use super::ExtractionRule;

/// Fields of the KDV return, in output column order.
pub fn builtin_rules() -> Vec<ExtractionRule> {
    vec![
        ExtractionRule::new("matrah_toplam", "Matrah Toplamı", &["Matrah Toplamı"]),
        ExtractionRule::new(
            "hesaplanan_kdv",
            "Hesaplanan Katma Değer Vergisi",
            &["Hesaplanan Katma Değer Vergisi", "Hesaplanan KDV"],
        ),
        ExtractionRule::new(
            "ilave_kdv",
            "Daha Önce İndirim Konusu Yapılan KDV'nin İlavesi",
            &["Daha Önce İndirim Konusu Yapılan KDV"],
        ),
        ExtractionRule::new(
            "toplam_kdv",
            "Toplam Katma Değer Vergisi",
            &["Toplam Katma Değer Vergisi"],
        ),
        ExtractionRule::new(
            "onceki_devreden",
            "Önceki Dönemden Devreden İndirilecek KDV",
            &[
                "Önceki Dönemden Devreden İndirilecek KDV",
                "Önceki Dönemden Devreden KDV",
            ],
        ),
        ExtractionRule::new(
            "yurtici_alis",
            "Yurtiçi Alımlara İlişkin KDV",
            &["Yurtiçi Alımlara İlişkin KDV"],
        ),
        ExtractionRule::new(
            "sorumlu_kdv",
            "Sorumlu Sıfatıyla Beyan Edilen KDV",
            &["Sorumlu Sıfatıyla Beyan Edilen KDV"],
        ),
        ExtractionRule::new(
            "ithalde_odenen",
            "İthalde Ödenen KDV",
            &["İthalde Ödenen KDV"],
        ),
        ExtractionRule::new(
            "indirimler_toplam",
            "İndirimler Toplamı",
            &["İndirimler Toplamı"],
        ),
        ExtractionRule::new(
            "tecil_edilecek",
            "Tecil Edilecek Katma Değer Vergisi",
            &["Tecil Edilecek Katma Değer Vergisi"],
        ),
        ExtractionRule::new(
            "odenmesi_gereken",
            "Ödenmesi Gereken Katma Değer Vergisi",
            &["Ödenmesi Gereken Katma Değer Vergisi"],
        ),
        ExtractionRule::new(
            "iade_edilmesi_gereken",
            "İade Edilmesi Gereken Katma Değer Vergisi",
            &["İade Edilmesi Gereken Katma Değer Vergisi"],
        ),
        ExtractionRule::new(
            "sonraki_doneme_devreden",
            "Sonraki Döneme Devreden Katma Değer Vergisi",
            &[
                "Sonraki Döneme Devreden Katma Değer Vergisi",
                "Sonraki Döneme Devreden KDV",
            ],
        ),
        ExtractionRule::new(
            "teslim_hizmet_bedel",
            "Teslim ve Hizmetlerin Karşılığını Teşkil Eden Bedel (aylık)",
            &[
                "Teslim ve Hizmetlerin Karşılığını Teşkil Eden Bedel",
                "Teşkil Eden Bedel (aylık)",
            ],
        ),
    ]
}
