//! 自省接口
//!
//! 每个能力接口都以 [`Wrapper`] 为父接口。调用方可以询问一个对象
//! "是否能提供类型 T"，并取得对应引用。驱动的默认实现只回答自身类型；
//! 包装层先回答自身，再回答拦截器，最后交给被委托对象。

use crate::core::{SqlError, SqlResult, TypeKey};
use std::any::Any;

pub trait Wrapper: Any + Send + Sync {
    /// 以 `Any` 形式暴露自身
    fn as_any(&self) -> &dyn Any;

    /// 按类型键取得能满足请求的对象
    ///
    /// 默认实现：请求自身类型时返回自身，否则返回 [`SqlError::NotWrapperFor`]
    fn unwrap_any(&self, key: TypeKey) -> SqlResult<&dyn Any> {
        let this = self.as_any();
        if key.matches(this) {
            Ok(this)
        } else {
            Err(SqlError::NotWrapperFor(key.name()))
        }
    }

    /// 是否能满足对类型键的请求
    fn is_wrapper_for_any(&self, key: TypeKey) -> SqlResult<bool> {
        Ok(key.matches(self.as_any()))
    }
}

/// [`Wrapper`] 的类型化便捷方法
pub trait WrapperExt: Wrapper {
    /// 取得类型为 `T` 的对象引用
    fn unwrap_as<T: Any>(&self) -> SqlResult<&T> {
        let key = TypeKey::of::<T>();
        self.unwrap_any(key)?
            .downcast_ref::<T>()
            .ok_or(SqlError::NotWrapperFor(key.name()))
    }

    /// 是否能提供类型为 `T` 的对象
    fn is_wrapper_for<T: Any>(&self) -> SqlResult<bool> {
        self.is_wrapper_for_any(TypeKey::of::<T>())
    }
}

impl<W: Wrapper + ?Sized> WrapperExt for W {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Wrapper for Plain {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_default_unwrap_self() {
        let p = Plain;
        assert!(p.unwrap_as::<Plain>().is_ok());
        assert!(p.is_wrapper_for::<Plain>().unwrap());
    }

    #[test]
    fn test_default_unwrap_other_fails() {
        let p = Plain;
        let err = p.unwrap_as::<String>().err().unwrap();
        assert!(matches!(err, SqlError::NotWrapperFor(name) if name.contains("String")));
        assert!(!p.is_wrapper_for::<String>().unwrap());
    }

    #[test]
    fn test_unwrap_through_trait_object() {
        let p: Box<dyn Wrapper> = Box::new(Plain);
        assert!(p.unwrap_as::<Plain>().is_ok());
    }
}
