//! Built-in message catalog
//!
//! Only the messages the console core emits itself. Unknown locales fall back
//! to English, unknown keys to the key.

use backoffice_core::environment::Translator;

/// Locales with a built-in catalog
pub const SUPPORTED_LOCALES: [&str; 3] = ["uz", "ru", "en"];

/// Static catalog for `uz`, `ru` and `en`
#[derive(Debug, Default, Clone, Copy)]
pub struct Catalog;

impl Catalog {
    fn english(key: &str) -> Option<&'static str> {
        Some(match key {
            "common.error" => "Something went wrong. Please try again.",
            "auth.requiredFields" => "Username and password are required",
            "auth.loginSuccess" => "Signed in successfully",
            "auth.loginFailed" => "Sign-in failed",
            "auth.sessionExpired" => "Your session has expired. Please sign in again.",
            "products.nameRequired" => "Product name is required",
            "products.priceInvalid" => "Price must be greater than zero",
            "products.stockInvalid" => "Stock must be zero or more",
            "products.categoryRequired" => "Category is required",
            "products.createSuccess" => "Product created",
            "products.updateSuccess" => "Product updated",
            "products.deleteSuccess" => "Product deleted",
            "orders.statusUpdateSuccess" => "Order status updated",
            "orders.cancelSuccess" => "Order cancelled",
            "orders.actionNotAllowed" => "This action is not available for the order",
            "common.busy" => "Another change is still in progress",
            _ => return None,
        })
    }

    fn uzbek(key: &str) -> Option<&'static str> {
        Some(match key {
            "common.error" => "Xatolik yuz berdi. Qaytadan urinib ko'ring.",
            "auth.requiredFields" => "Foydalanuvchi nomi va parol majburiy",
            "auth.loginSuccess" => "Tizimga muvaffaqiyatli kirildi",
            "auth.loginFailed" => "Tizimga kirib bo'lmadi",
            "auth.sessionExpired" => "Sessiya muddati tugadi. Qaytadan kiring.",
            "products.nameRequired" => "Mahsulot nomi majburiy",
            "products.priceInvalid" => "Narx noldan katta bo'lishi kerak",
            "products.stockInvalid" => "Zaxira manfiy bo'lmasligi kerak",
            "products.categoryRequired" => "Kategoriya majburiy",
            "products.createSuccess" => "Mahsulot yaratildi",
            "products.updateSuccess" => "Mahsulot yangilandi",
            "products.deleteSuccess" => "Mahsulot o'chirildi",
            "orders.statusUpdateSuccess" => "Buyurtma holati yangilandi",
            "orders.cancelSuccess" => "Buyurtma bekor qilindi",
            "orders.actionNotAllowed" => "Bu amal buyurtma uchun mavjud emas",
            "common.busy" => "Boshqa o'zgarish hali bajarilmoqda",
            _ => return None,
        })
    }

    fn russian(key: &str) -> Option<&'static str> {
        Some(match key {
            "common.error" => "Что-то пошло не так. Попробуйте ещё раз.",
            "auth.requiredFields" => "Имя пользователя и пароль обязательны",
            "auth.loginSuccess" => "Вход выполнен",
            "auth.loginFailed" => "Не удалось войти",
            "auth.sessionExpired" => "Сессия истекла. Войдите снова.",
            "products.nameRequired" => "Название товара обязательно",
            "products.priceInvalid" => "Цена должна быть больше нуля",
            "products.stockInvalid" => "Остаток не может быть отрицательным",
            "products.categoryRequired" => "Категория обязательна",
            "products.createSuccess" => "Товар создан",
            "products.updateSuccess" => "Товар обновлён",
            "products.deleteSuccess" => "Товар удалён",
            "orders.statusUpdateSuccess" => "Статус заказа обновлён",
            "orders.cancelSuccess" => "Заказ отменён",
            "orders.actionNotAllowed" => "Это действие недоступно для заказа",
            "common.busy" => "Предыдущее изменение ещё выполняется",
            _ => return None,
        })
    }
}

impl Translator for Catalog {
    fn translate(&self, locale: &str, key: &str) -> String {
        let language = locale.split(['-', '_']).next().unwrap_or(locale);
        let message = match language {
            "uz" => Self::uzbek(key),
            "ru" => Self::russian(key),
            _ => None,
        };
        message
            .or_else(|| Self::english(key))
            .map_or_else(|| key.to_string(), str::to_string)
    }
}
